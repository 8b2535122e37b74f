//! Record trait: a serializable document with a unique key in its collection.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record persisted as one document in a named collection.
///
/// `key()` must be unique within the collection; stores reject a second
/// record with the same key.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Returns the unique key of this record.
    fn key(&self) -> String;
}
