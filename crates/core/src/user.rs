use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Record};

/// A login identity.
///
/// Only the argon2 PHC hash of the password is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> DomainResult<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        Ok(Self {
            username,
            password_hash: password_hash.into(),
        })
    }
}

// Usernames are case-sensitive; the key is the exact string.
impl Record for User {
    fn key(&self) -> String {
        self.username.clone()
    }
}
