#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use grocery_api::auth::{TokenService, DEFAULT_TOKEN_TTL};
use grocery_api::database::{
    DatabaseManager, NewProduct, Product, ProductId, ProductStore, SqlProductStore, StoreError,
};
use grocery_api::limiter::{FakeRelativeClock, RateLimiter};
use grocery_api::AppState;

pub const SECRET: &str = "integration-test-secret";
pub const INTERVAL: Duration = Duration::from_secs(2);

/// Router wired like production, with a clock the test controls.
pub struct TestApp {
    pub router: Router,
    pub clock: FakeRelativeClock,
    pub tokens: Arc<TokenService>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body)
            .with_context(|| format!("body is not JSON: {:?}", String::from_utf8_lossy(&self.body)))
    }

    pub fn error_message(&self) -> Result<String> {
        let body = self.json()?;
        body["error"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("no error message in {}", body))
    }
}

pub async fn spawn_app() -> Result<TestApp> {
    let pool = DatabaseManager::connect_in_memory().await?;
    app_with_store(Arc::new(SqlProductStore::new(pool)))
}

pub fn app_with_store(store: Arc<dyn ProductStore>) -> Result<TestApp> {
    let clock = FakeRelativeClock::default();
    let limiter = RateLimiter::with_clock(INTERVAL, 1, &clock)?;
    let state = AppState::new(TokenService::new(SECRET, DEFAULT_TOKEN_TTL), limiter, store);
    let tokens = state.tokens.clone();

    Ok(TestApp {
        router: grocery_api::app(state),
        clock,
        tokens,
    })
}

impl TestApp {
    /// Moves past the throttle window so the next gated request gets a permit.
    pub fn tick(&self) {
        self.clock.advance(INTERVAL);
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<&Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(json)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(TestResponse { status, body })
    }

    pub async fn login(&self) -> Result<String> {
        let res = self.request(Method::POST, "/login", None, None).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "login failed with {}", res.status);
        res.json()?["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Logs in, refills the throttle, then sends with `Authorization: Bearer`.
    pub async fn authed(&self, method: Method, uri: &str, body: Option<&Value>) -> Result<TestResponse> {
        let token = self.login().await?;
        self.tick();
        self.request(method, uri, Some(&format!("Bearer {}", token)), body)
            .await
    }
}

/// Store whose every call fails, counting how often it was reached.
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend("store unavailable".to_string()))
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn find_by_id(&self, _id: ProductId) -> Result<Option<Product>, StoreError> {
        self.fail()
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        self.fail()
    }

    async fn create(&self, _product: NewProduct) -> Result<Product, StoreError> {
        self.fail()
    }

    async fn soft_delete(&self, _id: ProductId) -> Result<(), StoreError> {
        self.fail()
    }
}
