use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

use larder_api::app::{build_app, services::AppServices};
use larder_auth::TokenService;
use larder_core::{Order, RecordId};
use larder_infra::store::{DocumentStore, InMemoryDocumentStore, InsertAck, StoredDocument};
use larder_infra::{CollectionNames, Filter, RecordStore, StoreError, seed};

const JWT_SECRET: &[u8] = b"black-box-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn tokens() -> TokenService {
    TokenService::new(JWT_SECRET, Duration::hours(1))
}

async fn seeded_services() -> AppServices {
    let store = RecordStore::in_memory(CollectionNames::default());
    seed(&store).await.expect("seed");
    AppServices::new(store, tokens())
}

async fn get_json(client: &reqwest::Client, url: String, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = client.get(url);
    if let Some(token) = token {
        req = req.header("Authorization", token);
    }
    let res = req.send().await.unwrap();
    let status = res.status();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn(seeded_services().await).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn products_lists_every_item() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, server.url("/products"), None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(
        items[0],
        json!({ "_id": 1, "sku": "almonds", "description": "product 1", "instock": 120 })
    );
}

#[tokio::test]
async fn low_quantity_returns_items_under_one_hundred() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let (_, all) = get_json(&client, server.url("/products"), None).await;
    let (status, low) = get_json(&client, server.url("/products/low-quantity"), None).await;

    assert_eq!(status, StatusCode::OK);
    let low = low.as_array().unwrap();
    let skus: Vec<&str> = low.iter().map(|i| i["sku"].as_str().unwrap()).collect();
    assert_eq!(skus, ["bread", "cashews", "pecans"]);

    let all = all.as_array().unwrap();
    for item in low {
        assert!(item["instock"].as_u64().unwrap() < 100);
        assert!(all.contains(item));
    }
}

#[tokio::test]
async fn login_issues_token_for_username() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/login"))
        .json(&json!({ "username": "alice", "password": "MindX@2022" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(tokens().verify(token).unwrap().username, "alice");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    for (username, password) in [("alice", "wrong"), ("mallory", "MindX@2022")] {
        let res = client
            .post(server.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert!(body.get("token").is_none());
        assert_eq!(body["error"], "invalid_credentials");
    }
}

#[tokio::test]
async fn login_without_credentials_is_rejected_as_json() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/login"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");
    assert!(body.get("token").is_none());

    let res = client
        .post(server.url("/login"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn unknown_path_is_not_found_without_a_token() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/nope")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_require_a_token() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, server.url("/orders"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn orders_reject_invalid_or_expired_tokens() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();

    let (status, _) = get_json(&client, server.url("/orders"), Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let expired = tokens()
        .sign_at("alice", Utc::now() - Duration::hours(2))
        .unwrap();
    let (status, body) = get_json(&client, server.url("/orders"), Some(&expired)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "invalid_token");

    let foreign = TokenService::new(b"someone-else", Duration::hours(1))
        .sign("alice")
        .unwrap();
    let (status, _) = get_json(&client, server.url("/orders"), Some(&foreign)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn orders_are_joined_with_descriptions() {
    let server = TestServer::spawn(seeded_services().await).await;
    let client = reqwest::Client::new();
    let token = tokens().sign("alice").unwrap();

    for header in [token.clone(), format!("Bearer {token}")] {
        let (status, body) = get_json(&client, server.url("/orders"), Some(&header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "_id": 1, "item": "almonds", "price": 12, "quantity": 2, "description": "product 1" },
                { "_id": 2, "item": "pecans", "price": 20, "quantity": 1, "description": "product 4" },
                { "_id": 3, "item": "pecans", "price": 20, "quantity": 3, "description": "product 4" },
            ])
        );
    }
}

#[tokio::test]
async fn order_with_unknown_sku_has_null_description() {
    let services = seeded_services().await;
    let stray = Order::new(RecordId::new(4), "walnuts", 9, 1).unwrap();
    services.store().orders().insert_many(&[stray]).await.unwrap();
    let server = TestServer::spawn(services).await;
    let client = reqwest::Client::new();
    let token = tokens().sign("admin").unwrap();

    let (status, body) = get_json(&client, server.url("/orders"), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 4);
    assert_eq!(orders[3]["item"], "walnuts");
    assert_eq!(orders[3]["description"], Value::Null);
}

struct FailingStore;

#[async_trait::async_trait]
impl DocumentStore for FailingStore {
    async fn find(&self, _collection: &str, _filter: &Filter) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn find_one(
        &self,
        _collection: &str,
        _filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn insert_many(
        &self,
        _collection: &str,
        _documents: Vec<StoredDocument>,
    ) -> Result<InsertAck, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn count(&self, _collection: &str) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

fn assert_store_error(route: &str, status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{route}");
    assert_eq!(body["error"], "store_error", "{route}");
    assert!(!body["message"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn store_failure_is_a_server_error_on_every_route() {
    let store = RecordStore::new(Arc::new(FailingStore), CollectionNames::default());
    let server = TestServer::spawn(AppServices::new(store, tokens())).await;
    let client = reqwest::Client::new();
    let token = tokens().sign("alice").unwrap();

    for (route, auth) in [
        ("/products", None),
        ("/products/low-quantity", None),
        ("/orders", Some(token.as_str())),
    ] {
        let (status, body) = get_json(&client, server.url(route), auth).await;
        assert_store_error(route, status, &body);
    }

    let res = client
        .post(server.url("/login"))
        .json(&json!({ "username": "alice", "password": "MindX@2022" }))
        .send()
        .await
        .unwrap();
    let status = res.status();
    let body: Value = res.json().await.unwrap();
    assert_store_error("/login", status, &body);
    assert!(body.get("token").is_none());
}

/// Seeded store whose point lookups fail while scans succeed.
struct LookupFailingStore {
    inner: Arc<InMemoryDocumentStore>,
}

#[async_trait::async_trait]
impl DocumentStore for LookupFailingStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        _collection: &str,
        _filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<StoredDocument>,
    ) -> Result<InsertAck, StoreError> {
        self.inner.insert_many(collection, documents).await
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        self.inner.count(collection).await
    }
}

#[tokio::test]
async fn failed_inventory_lookup_fails_the_order_listing() {
    let inner = Arc::new(InMemoryDocumentStore::new());
    seed(&RecordStore::new(inner.clone(), CollectionNames::default()))
        .await
        .expect("seed");
    let store = RecordStore::new(
        Arc::new(LookupFailingStore { inner }),
        CollectionNames::default(),
    );
    let server = TestServer::spawn(AppServices::new(store, tokens())).await;
    let client = reqwest::Client::new();
    let token = tokens().sign("alice").unwrap();

    let (status, body) = get_json(&client, server.url("/products"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = get_json(&client, server.url("/orders"), Some(&token)).await;
    assert_store_error("/orders", status, &body);
}
