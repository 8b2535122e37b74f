use std::sync::Arc;

use axum::{Json, Router, extract::Extension, routing::get};
use tracing::debug;

use crate::app::dto::OrderWithDescription;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AuthenticatedUser;

pub fn router() -> Router {
    Router::new().route("/orders", get(list_orders))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<OrderWithDescription>>, ApiError> {
    debug!(username = user.username(), "listing orders");
    Ok(Json(services.orders_with_descriptions().await?))
}
