#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use cart_service::config::{CartConfig, MongoConfig, StoreBackend};
use cart_service::models::CartItem;
use cart_service::services::{CartStore, InMemoryCartStore, MongoCartStore, StoreError};
use cart_service::startup::{build_router, AppState, Application};
use mongodb::bson::{oid::ObjectId, Document};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config(store: StoreBackend) -> CartConfig {
    CartConfig {
        common: CoreConfig { port: 0 },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: format!("cart_test_{}", uuid::Uuid::new_v4().simple()),
        },
        store,
    }
}

pub fn router_with(store: Arc<dyn CartStore>) -> Router {
    build_router(AppState::new(test_config(StoreBackend::Memory), store))
}

pub fn memory_router() -> Router {
    router_with(Arc::new(InMemoryCartStore::new()))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("Response body is not JSON")
    }
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    TestResponse {
        status,
        headers,
        text: String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8"),
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    match body {
        Some(json) => {
            send_raw(
                app,
                method,
                uri,
                Some("application/json"),
                Body::from(json.to_string()),
            )
            .await
        }
        None => send_raw(app, method, uri, None, Body::empty()).await,
    }
}

/// Delegates to an in-memory store and counts every call.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryCartStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CartStore for CountingStore {
    async fn insert(&self, fields: Document) -> Result<CartItem, StoreError> {
        self.record();
        self.inner.insert(fields).await
    }

    async fn find_all(&self) -> Result<Vec<CartItem>, StoreError> {
        self.record();
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<CartItem>, StoreError> {
        self.record();
        self.inner.find_by_id(id).await
    }

    async fn merge(&self, id: ObjectId, fields: Document) -> Result<Option<CartItem>, StoreError> {
        self.record();
        self.inner.merge(id, fields).await
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        self.record();
        self.inner.delete(id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

/// Fails every operation, as an unreachable database would.
pub struct FailingStore;

fn unavailable() -> StoreError {
    let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store unavailable");
    StoreError::Mongo(mongodb::error::Error::from(refused))
}

#[async_trait]
impl CartStore for FailingStore {
    async fn insert(&self, _fields: Document) -> Result<CartItem, StoreError> {
        Err(unavailable())
    }

    async fn find_all(&self) -> Result<Vec<CartItem>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<CartItem>, StoreError> {
        Err(unavailable())
    }

    async fn merge(&self, _id: ObjectId, _fields: Document) -> Result<Option<CartItem>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: ObjectId) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

/// Panics inside every operation.
pub struct PanicStore;

#[async_trait]
impl CartStore for PanicStore {
    async fn insert(&self, _fields: Document) -> Result<CartItem, StoreError> {
        panic!("insert exploded")
    }

    async fn find_all(&self) -> Result<Vec<CartItem>, StoreError> {
        panic!("find_all exploded")
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<CartItem>, StoreError> {
        panic!("find_by_id exploded")
    }

    async fn merge(&self, _id: ObjectId, _fields: Document) -> Result<Option<CartItem>, StoreError> {
        panic!("merge exploded")
    }

    async fn delete(&self, _id: ObjectId) -> Result<bool, StoreError> {
        panic!("delete exploded")
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        panic!("health_check exploded")
    }
}

/// A running server backed by a live MongoDB database.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db_name: String,
    pub db: MongoCartStore,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = test_config(StoreBackend::MongoDb);
        let db_name = config.mongodb.database.clone();

        let db = MongoCartStore::connect(&config.mongodb.uri, &db_name)
            .await
            .expect("Failed to connect to MongoDB");

        let app = Application::build_with_store(config, Arc::new(db.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db_name,
            db,
        }
    }

    /// Drops the per-test database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
