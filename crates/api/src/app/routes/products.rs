use std::sync::Arc;

use axum::{Json, Router, extract::Extension, routing::get};

use larder_core::InventoryItem;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/low-quantity", get(list_low_quantity))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(services.products_list().await?))
}

/// Items with fewer than 100 units in stock.
pub async fn list_low_quantity(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(services.products_low_stock().await?))
}
