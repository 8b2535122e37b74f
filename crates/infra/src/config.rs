//! Configuration loading and representation.
//!
//! Everything is read from `LARDER_*` environment variables; the binary
//! applies CLI overrides on top.

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

pub const ENV_DATABASE_URL: &str = "LARDER_DATABASE_URL";
pub const ENV_DATABASE_NAME: &str = "LARDER_DATABASE_NAME";
pub const ENV_ORDERS_COLLECTION: &str = "LARDER_ORDERS_COLLECTION";
pub const ENV_INVENTORY_COLLECTION: &str = "LARDER_INVENTORY_COLLECTION";
pub const ENV_USERS_COLLECTION: &str = "LARDER_USERS_COLLECTION";
pub const ENV_JWT_SECRET: &str = "LARDER_JWT_SECRET";
pub const ENV_PORT: &str = "LARDER_PORT";
pub const ENV_TOKEN_TTL_SECS: &str = "LARDER_TOKEN_TTL_SECS";

/// Database used when neither `LARDER_DATABASE_NAME` nor the URL names one.
pub const DEFAULT_DATABASE_NAME: &str = "food";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;
const DEV_JWT_SECRET: &str = "larder-dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Names of the three collections the service reads and seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub orders: String,
    pub inventory: String,
    pub users: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            orders: "orders".to_string(),
            inventory: "inventory".to_string(),
            users: "users".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `None` selects the in-memory store.
    pub url: Option<String>,
    /// Explicit override; wins over a database named in `url`.
    pub database_name: Option<String>,
    pub collections: CollectionNames,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = CollectionNames::default();
        let collections = CollectionNames {
            orders: get(ENV_ORDERS_COLLECTION).unwrap_or(defaults.orders),
            inventory: get(ENV_INVENTORY_COLLECTION).unwrap_or(defaults.inventory),
            users: get(ENV_USERS_COLLECTION).unwrap_or(defaults.users),
        };

        let store = StoreConfig {
            url: get(ENV_DATABASE_URL),
            database_name: get(ENV_DATABASE_NAME),
            collections,
        };

        let jwt_secret = get(ENV_JWT_SECRET).unwrap_or_else(|| {
            warn!("{ENV_JWT_SECRET} not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let token_ttl = match get(ENV_TOKEN_TTL_SECS) {
            Some(raw) => parse_ttl(ENV_TOKEN_TTL_SECS, &raw)?,
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let port = match get(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: ENV_PORT,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            store,
            auth: AuthConfig {
                jwt_secret,
                token_ttl,
            },
            port,
        })
    }
}

/// A whole number of seconds in `1..=MAX_TOKEN_TTL_SECS`.
fn parse_ttl(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason,
    };
    let secs = raw.trim().parse::<i64>().map_err(|e| invalid(e.to_string()))?;
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Err(invalid(format!(
            "must be between 1 and {MAX_TOKEN_TTL_SECS} seconds"
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| invalid("out of range".to_string()))
}
