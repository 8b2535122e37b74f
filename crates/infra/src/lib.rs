//! Infrastructure layer: record store, seeding, configuration.

pub mod config;
pub mod seed;
pub mod store;

pub use config::{AppConfig, AuthConfig, CollectionNames, ConfigError, StoreConfig};
pub use seed::{SeedError, SeedOutcome, SeedReport, seed};
pub use store::{Collection, DocumentStore, Filter, RecordStore, StoreError};
