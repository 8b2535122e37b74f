use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a larder bearer token.
///
/// Timestamps are Unix seconds, as in registered JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(username: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the token time window against `now`.
///
/// Signature verification happens before this, in [`TokenService`](crate::TokenService).
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), ClaimsError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(ClaimsError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(ClaimsError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(ClaimsError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(now: DateTime<Utc>) -> TokenClaims {
        TokenClaims::new("alice", now, now + Duration::minutes(10))
    }

    #[test]
    fn accepts_token_inside_window() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims_at(now), now), Ok(()));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let later = now + Duration::minutes(11);
        assert_eq!(validate_claims(&claims_at(now), later), Err(ClaimsError::Expired));
    }

    #[test]
    fn rejects_token_from_the_future() {
        let now = Utc::now();
        let earlier = now - Duration::minutes(1);
        assert_eq!(
            validate_claims(&claims_at(now), earlier),
            Err(ClaimsError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let claims = TokenClaims::new("alice", now, now);
        assert_eq!(
            validate_claims(&claims, now),
            Err(ClaimsError::InvalidTimeWindow)
        );
    }
}
