use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use super::filter::Filter;
use super::r#trait::{DocumentStore, InsertAck, StoreError, StoredDocument};

/// In-memory document store.
///
/// Intended for tests/dev. Filters are evaluated with [`Filter::matches`] over
/// a full scan of the collection.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<JsonValue>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;

        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.body))
                    .map(|d| d.body.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<JsonValue>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;

        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|d| filter.matches(&d.body))
                .map(|d| d.body.clone())
        }))
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<StoredDocument>,
    ) -> Result<InsertAck, StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let existing = collections.entry(collection.to_string()).or_default();

        // Validate the whole batch before touching the collection.
        let mut seen: HashSet<&str> = existing.iter().map(|d| d.key.as_str()).collect();
        for doc in &documents {
            if !seen.insert(doc.key.as_str()) {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    key: doc.key.clone(),
                });
            }
        }

        let inserted = documents.len() as u64;
        existing.extend(documents);
        Ok(InsertAck { inserted })
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }
}
