use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Record, RecordId};

/// Items with fewer units in stock than this are reported as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 100;

/// A stocked product, addressed by its unique `sku`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub sku: String,
    pub description: String,
    pub instock: u32,
}

impl InventoryItem {
    pub fn new(
        id: RecordId,
        sku: impl Into<String>,
        description: impl Into<String>,
        instock: u32,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(DomainError::validation("inventory sku must not be empty"));
        }
        Ok(Self {
            id,
            sku,
            description: description.into(),
            instock,
        })
    }

    pub fn is_low_stock(&self) -> bool {
        self.instock < LOW_STOCK_THRESHOLD
    }
}

impl Record for InventoryItem {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        let at = InventoryItem::new(RecordId::new(1), "a", "x", LOW_STOCK_THRESHOLD).unwrap();
        let below =
            InventoryItem::new(RecordId::new(2), "b", "y", LOW_STOCK_THRESHOLD - 1).unwrap();
        assert!(!at.is_low_stock());
        assert!(below.is_low_stock());
    }

    #[test]
    fn new_rejects_empty_sku() {
        assert!(InventoryItem::new(RecordId::new(1), "", "x", 1).is_err());
    }
}
