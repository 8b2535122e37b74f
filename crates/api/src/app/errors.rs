use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use larder_auth::{PasswordError, TokenError};
use larder_infra::StoreError;

/// Every failure a handler can report.
///
/// Storage and internal failures are logged here and reach the client only
/// as a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing authorization token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[source] TokenError),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::MissingToken => {
                json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized")
            }
            ApiError::InvalidToken(err) => {
                debug!(error = %err, "rejected bearer token");
                json_error(StatusCode::FORBIDDEN, "invalid_token", "Invalid token")
            }
            ApiError::InvalidCredentials => json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password",
            ),
            ApiError::MalformedBody(rejection) => {
                json_error(rejection.status(), "bad_request", rejection.body_text())
            }
            ApiError::Store(err) => {
                error!(error = %err, "record store request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    "Failed to access the record store",
                )
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "internal error");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
