use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use larder_auth::{TokenError, TokenService};

use crate::app::errors::ApiError;
use crate::context::AuthenticatedUser;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
}

/// Token gate: 401 without a token, 403 when the token does not verify.
pub async fn require_token(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers())?;

    let claims = state.tokens.verify(token).map_err(ApiError::InvalidToken)?;

    req.extensions_mut()
        .insert(AuthenticatedUser::new(claims.username));

    Ok(next.run(req).await)
}

/// Accepts both `Authorization: <token>` and `Authorization: Bearer <token>`.
fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::MissingToken)?;

    let header = header.to_str().map_err(|_| {
        ApiError::InvalidToken(TokenError::Invalid(
            "authorization header is not visible ASCII".to_string(),
        ))
    })?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    Ok(token)
}
