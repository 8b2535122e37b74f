//! `larder-auth`: bearer tokens and password hashing.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{ClaimsError, TokenClaims, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use token::{TokenError, TokenService};
