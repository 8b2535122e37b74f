/// Identity attached to a request by the token gate.
///
/// Only present on routes behind [`require_token`](crate::middleware::require_token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    username: String,
}

impl AuthenticatedUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
