//! Record identifiers.

use serde::{Deserialize, Serialize};

/// Externally assigned identifier of an order or inventory record.
///
/// Serialized as a bare integer so documents keep the `{"_id": 1}` shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_integer() {
        let id = RecordId::new(7);
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(7));
        let back: RecordId = serde_json::from_value(serde_json::json!(7)).unwrap();
        assert_eq!(back, id);
    }
}
