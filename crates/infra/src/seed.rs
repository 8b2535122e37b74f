//! Sample data seeding.
//!
//! Policy: skip-if-exists, per collection. A collection that already holds
//! any document is left untouched, so re-running the seed is a no-op.
//! Two seeders racing on an empty collection can still collide; the loser
//! fails with [`StoreError::Duplicate`].

use larder_auth::{PasswordError, hash_password};
use larder_core::{DomainError, InventoryItem, Order, Record, RecordId, User};
use thiserror::Error;
use tracing::info;

use crate::store::{Collection, RecordStore, StoreError};

const SAMPLE_PASSWORD: &str = "MindX@2022";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid sample record: {0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// What seeding did to one collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Applied { inserted: u64 },
    AlreadySeeded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub orders: SeedOutcome,
    pub inventory: SeedOutcome,
    pub users: SeedOutcome,
}

pub fn sample_orders() -> Result<Vec<Order>, DomainError> {
    Ok(vec![
        Order::new(RecordId::new(1), "almonds", 12, 2)?,
        Order::new(RecordId::new(2), "pecans", 20, 1)?,
        Order::new(RecordId::new(3), "pecans", 20, 3)?,
    ])
}

pub fn sample_inventory() -> Result<Vec<InventoryItem>, DomainError> {
    Ok(vec![
        InventoryItem::new(RecordId::new(1), "almonds", "product 1", 120)?,
        InventoryItem::new(RecordId::new(2), "bread", "product 2", 80)?,
        InventoryItem::new(RecordId::new(3), "cashews", "product 3", 60)?,
        InventoryItem::new(RecordId::new(4), "pecans", "product 4", 70)?,
    ])
}

/// Sample users, with their passwords hashed.
pub fn sample_users() -> Result<Vec<User>, SeedError> {
    ["admin", "alice"]
        .into_iter()
        .map(|username| -> Result<User, SeedError> {
            Ok(User::new(username, hash_password(SAMPLE_PASSWORD)?)?)
        })
        .collect()
}

/// Populate empty collections with the sample records.
pub async fn seed(store: &RecordStore) -> Result<SeedReport, SeedError> {
    let orders = seed_collection(&store.orders(), || Ok(sample_orders()?)).await?;
    let inventory = seed_collection(&store.inventory(), || Ok(sample_inventory()?)).await?;
    let users = seed_collection(&store.users(), sample_users).await?;

    Ok(SeedReport {
        orders,
        inventory,
        users,
    })
}

async fn seed_collection<T, F>(collection: &Collection<T>, records: F) -> Result<SeedOutcome, SeedError>
where
    T: Record,
    F: FnOnce() -> Result<Vec<T>, SeedError>,
{
    let existing = collection.count().await?;
    if existing > 0 {
        info!(
            collection = collection.name(),
            existing, "collection already seeded; skipping"
        );
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let ack = collection.insert_many(&records()?).await?;
    info!(
        collection = collection.name(),
        inserted = ack.inserted,
        "collection seeded"
    );
    Ok(SeedOutcome::Applied {
        inserted: ack.inserted,
    })
}
