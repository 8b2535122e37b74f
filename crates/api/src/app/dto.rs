use serde::{Deserialize, Serialize};

use larder_core::Order;

// No Debug: the body carries a plaintext password.
// Missing fields default to empty and fail as bad credentials.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// An order joined with its inventory description.
///
/// `description` is `null` when no inventory item carries the order's sku.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithDescription {
    #[serde(flatten)]
    pub order: Order,
    pub description: Option<String>,
}
