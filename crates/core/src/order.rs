use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Record, RecordId};

/// A customer order for a quantity of one inventory sku.
///
/// `item` is expected to match an [`InventoryItem::sku`](crate::InventoryItem),
/// but nothing enforces it; readers must tolerate a dangling reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub item: String,
    /// Unit price in the smallest currency unit.
    pub price: u64,
    pub quantity: u32,
}

impl Order {
    pub fn new(
        id: RecordId,
        item: impl Into<String>,
        price: u64,
        quantity: u32,
    ) -> DomainResult<Self> {
        let item = item.into();
        if item.trim().is_empty() {
            return Err(DomainError::validation("order item must not be empty"));
        }
        if quantity == 0 {
            return Err(DomainError::validation("order quantity must be positive"));
        }
        Ok(Self {
            id,
            item,
            price,
            quantity,
        })
    }
}

impl Record for Order {
    fn key(&self) -> String {
        self.id.to_string()
    }
}
