use std::marker::PhantomData;
use std::sync::Arc;

use larder_core::Record;

use super::filter::Filter;
use super::r#trait::{DocumentStore, InsertAck, StoreError, StoredDocument};

/// Typed handle onto one named collection.
///
/// Records are (de)serialized with serde; a stored document that no longer
/// matches `T` surfaces as [`StoreError::Decode`].
pub struct Collection<T> {
    backend: Arc<dyn DocumentStore>,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> core::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish()
    }
}

impl<T: Record> Collection<T> {
    pub fn new(backend: Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            backend,
            name: name.into(),
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.backend
            .find(&self.name, filter)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        self.backend
            .find_one(&self.name, filter)
            .await?
            .map(|doc| self.decode(doc))
            .transpose()
    }

    pub async fn insert_many(&self, records: &[T]) -> Result<InsertAck, StoreError> {
        let documents = records
            .iter()
            .map(|record| {
                let body = serde_json::to_value(record).map_err(|e| StoreError::Encode {
                    collection: self.name.clone(),
                    message: e.to_string(),
                })?;
                Ok(StoredDocument {
                    key: record.key(),
                    body,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        self.backend.insert_many(&self.name, documents).await
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.backend.count(&self.name).await
    }

    fn decode(&self, doc: serde_json::Value) -> Result<T, StoreError> {
        serde_json::from_value(doc).map_err(|e| StoreError::Decode {
            collection: self.name.clone(),
            message: e.to_string(),
        })
    }
}
