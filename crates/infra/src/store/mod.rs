//! Record store adapter.
//!
//! Layers, bottom up:
//! - [`DocumentStore`]: untyped JSON documents in named collections
//!   (in-memory for tests/dev, Postgres JSONB in production)
//! - [`Collection`]: typed, serde-mapped view of one collection
//! - [`RecordStore`]: the three collections the service works with

pub mod collection;
pub mod filter;
pub mod in_memory;
pub mod postgres;
pub mod r#trait;

use std::sync::Arc;

use larder_core::{InventoryItem, Order, User};
use tracing::warn;

use crate::config::{CollectionNames, StoreConfig};

pub use collection::Collection;
pub use filter::{Filter, Predicate};
pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{DocumentStore, InsertAck, StoreError, StoredDocument};

/// Handle onto the orders, inventory and users collections.
///
/// Cheap to clone; every clone shares one backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn DocumentStore>,
    names: CollectionNames,
}

impl core::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordStore")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(backend: Arc<dyn DocumentStore>, names: CollectionNames) -> Self {
        Self { backend, names }
    }

    /// Fresh, empty in-memory store.
    pub fn in_memory(names: CollectionNames) -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), names)
    }

    /// Open the store described by `config`.
    ///
    /// Without a database URL this falls back to an in-memory store, which
    /// loses everything on exit.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        match &config.url {
            Some(url) => {
                let backend = PostgresDocumentStore::connect(url, config.database_name.as_deref()).await?;
                Ok(Self::new(Arc::new(backend), config.collections.clone()))
            }
            None => {
                warn!("no database URL configured; using a non-persistent in-memory store");
                Ok(Self::in_memory(config.collections.clone()))
            }
        }
    }

    pub fn orders(&self) -> Collection<Order> {
        Collection::new(self.backend.clone(), self.names.orders.clone())
    }

    pub fn inventory(&self) -> Collection<InventoryItem> {
        Collection::new(self.backend.clone(), self.names.inventory.clone())
    }

    pub fn users(&self) -> Collection<User> {
        Collection::new(self.backend.clone(), self.names.users.clone())
    }
}
