use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    routing::post,
};
use tracing::info;

use crate::app::dto::{LoginRequest, LoginResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/login", post(login))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(body) = body?;
    let token = services.login(&body.username, body.password).await?;
    info!(username = %body.username, "issued token");
    Ok(Json(LoginResponse { token }))
}
