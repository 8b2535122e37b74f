//! `larder-core`: record types shared by every larder crate.
//!
//! This crate contains **pure domain** types (no storage, no HTTP).

pub mod error;
pub mod id;
pub mod inventory;
pub mod order;
pub mod record;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use inventory::{InventoryItem, LOW_STOCK_THRESHOLD};
pub use order::Order;
pub use record::Record;
pub use user::User;
