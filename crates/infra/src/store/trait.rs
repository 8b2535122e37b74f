use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::filter::Filter;

/// A document ready to be inserted into a collection.
///
/// `key` is the record's unique key within the collection; `body` is the
/// full JSON document as returned by later reads.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: String,
    pub body: JsonValue,
}

/// Acknowledgement of a successful `insert_many`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InsertAck {
    pub inserted: u64,
}

/// Record store operation error.
///
/// Every variant is an infrastructure failure; the API layer reports all of
/// them as a generic server error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("duplicate key '{key}' in collection '{collection}'")]
    Duplicate { collection: String, key: String },

    #[error("failed to decode document from '{collection}': {message}")]
    Decode { collection: String, message: String },

    #[error("failed to encode document for '{collection}': {message}")]
    Encode { collection: String, message: String },
}

/// Untyped document store holding named collections of JSON documents.
///
/// ## Semantics
///
/// - `find` returns every document matching the filter, in insertion order
/// - `find_one` returns the first such document, or `None`
/// - `insert_many` is all-or-nothing: a key that already exists in the
///   collection (or repeats within the batch) fails the whole batch with
///   [`StoreError::Duplicate`]
/// - an unknown collection behaves as an empty one
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<JsonValue>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<JsonValue>, StoreError>;

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<StoredDocument>,
    ) -> Result<InsertAck, StoreError>;

    async fn count(&self, collection: &str) -> Result<u64, StoreError>;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<JsonValue>, StoreError> {
        (**self).find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<JsonValue>, StoreError> {
        (**self).find_one(collection, filter).await
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<StoredDocument>,
    ) -> Result<InsertAck, StoreError> {
        (**self).insert_many(collection, documents).await
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        (**self).count(collection).await
    }
}
