//! Request-independent services shared by every handler.

use std::sync::OnceLock;

use futures_util::future::try_join_all;
use tracing::warn;

use larder_auth::{PasswordError, TokenService, hash_password, verify_password};
use larder_core::{InventoryItem, LOW_STOCK_THRESHOLD, Order};
use larder_infra::{AppConfig, Collection, Filter, RecordStore, StoreError};

use crate::app::dto::OrderWithDescription;
use crate::app::errors::ApiError;

/// Store handle plus token service, injected into handlers.
#[derive(Debug, Clone)]
pub struct AppServices {
    store: RecordStore,
    tokens: TokenService,
}

impl AppServices {
    pub fn new(store: RecordStore, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Connect the configured store and build the token service.
    pub async fn build(config: &AppConfig) -> Result<Self, StoreError> {
        let store = RecordStore::connect(&config.store).await?;
        let tokens = TokenService::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl);
        Ok(Self::new(store, tokens))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn products_list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.store.inventory().find(&Filter::all()).await
    }

    pub async fn products_low_stock(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.store
            .inventory()
            .find(&Filter::lt("instock", LOW_STOCK_THRESHOLD))
            .await
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, username: &str, password: String) -> Result<String, ApiError> {
        let user = self
            .store
            .users()
            .find_one(&Filter::eq("username", username))
            .await?;

        // Unknown users still pay for one verification, so response time
        // does not reveal which usernames exist.
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || match stored {
            Some(stored) => verify_password(&password, &stored),
            None => verify_password(&password, dummy_hash()?).map(|_| false),
        })
        .await
        .map_err(|e| ApiError::Internal(format!("password check panicked: {e}")))??;

        match user {
            Some(user) if matches => self
                .tokens
                .sign(&user.username)
                .map_err(|e| ApiError::Internal(e.to_string())),
            _ => Err(ApiError::InvalidCredentials),
        }
    }

    /// All orders, each joined with its inventory description.
    ///
    /// One point lookup per order, issued concurrently; output keeps the
    /// order sequence returned by the store.
    pub async fn orders_with_descriptions(&self) -> Result<Vec<OrderWithDescription>, StoreError> {
        let orders = self.store.orders().find(&Filter::all()).await?;
        let inventory = self.store.inventory();

        try_join_all(orders.into_iter().map(|order| describe(&inventory, order))).await
    }
}

/// Hash checked against when the username is unknown. Computed once.
fn dummy_hash() -> Result<&'static str, PasswordError> {
    static DUMMY: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("larder-unknown-user")?;
    Ok(DUMMY.get_or_init(|| hash).as_str())
}

async fn describe(
    inventory: &Collection<InventoryItem>,
    order: Order,
) -> Result<OrderWithDescription, StoreError> {
    let product = inventory
        .find_one(&Filter::eq("sku", order.item.as_str()))
        .await?;

    let description = match product {
        Some(product) => Some(product.description),
        None => {
            warn!(order_id = %order.id, sku = %order.item, "order references unknown sku");
            None
        }
    };

    Ok(OrderWithDescription { order, description })
}
