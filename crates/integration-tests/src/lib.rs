//! Integration tests for Bistro.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bistro-integration-tests
//! ```
//!
//! Tests drive the full router (extractors, guards, error rendering) with
//! `tower::ServiceExt::oneshot`. No database or network is needed: the store
//! is a [`MemoryStore`] and payments go to a [`StubGateway`].
//!
//! # Test Categories
//!
//! - `auth` - token issuance, 401/403 guards
//! - `users` - registration, roles, admin check
//! - `carts` - cart lines, ownership
//! - `menus` - menu CRUD and cascade delete
//! - `payments` - payment intents

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Map, Value};
use tower::ServiceExt;

use bistro_core::{Email, Role};
use bistro_server::config::{PaymentConfig, ServerConfig};
use bistro_server::db::{MemoryStore, MenuStore, UserStore};
use bistro_server::models::{MenuItem, MenuItemInput, NewUser, User};
use bistro_server::services::{PaymentError, PaymentGateway, PaymentIntent, TokenService};
use bistro_server::{AppState, app};

pub const TEST_TOKEN_SECRET: &str = "q8Z!r2Lp#5Wm@9Tx$3Vb^7Nc&1Hd*4Kf";

/// Payment gateway double that records every request.
#[derive(Default)]
pub struct StubGateway {
    calls: Mutex<Vec<(i64, String)>>,
    failure: Mutex<Option<String>>,
}

impl StubGateway {
    /// Make every following call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_owned());
    }

    /// `(amount, currency)` of every call so far.
    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((amount, currency.to_owned()));
            calls.len()
        };

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(PaymentError::Api {
                status: 402,
                message,
            });
        }

        Ok(PaymentIntent {
            id: format!("pi_test_{n}"),
            client_secret: format!("pi_test_{n}_secret_{amount}"),
        })
    }
}

/// Configuration that never touches the network.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://localhost/bistro_test".to_owned()),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        access_token_secret: SecretString::from(TEST_TOKEN_SECRET.to_owned()),
        payment: PaymentConfig {
            secret_key: SecretString::from("sk_test_unused".to_owned()),
            api_base: "http://127.0.0.1:9".to_owned(),
            currency: "usd".to_owned(),
        },
        cors_allowed_origins: Vec::new(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A router wired to in-memory collaborators.
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub payments: Arc<StubGateway>,
    tokens: TokenService,
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let config = test_config();
        let tokens = TokenService::new(&config.access_token_secret);
        let store = Arc::new(MemoryStore::new());
        let payments = Arc::new(StubGateway::default());

        let state = AppState::new(config, store.clone(), payments.clone());

        Self {
            app: app(state),
            store,
            payments,
            tokens,
        }
    }

    /// Sign an access token for `email`.
    pub fn token(&self, email: &str) -> String {
        let mut profile = Map::new();
        profile.insert("email".to_owned(), Value::String(email.to_owned()));
        self.tokens.issue(profile).unwrap()
    }

    /// Store a user directly, bypassing the HTTP surface.
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let mut user = User::from_signup(NewUser {
            email: Email::parse(email).unwrap(),
            profile: Map::new(),
        });
        user.role = role;
        self.store.insert_user(&user).await.unwrap();
        user
    }

    /// Store an admin and return a token for them.
    pub async fn admin_token(&self, email: &str) -> String {
        self.seed_user(email, Role::Admin).await;
        self.token(email)
    }

    /// Store a menu item directly.
    pub async fn seed_menu_item(&self, name: &str, price: Decimal) -> MenuItem {
        let item = MenuItem::new(MenuItemInput {
            name: name.to_owned(),
            price,
            category: "main".to_owned(),
            attributes: Map::new(),
        });
        self.store.insert_menu_item(&item).await.unwrap();
        item
    }

    /// Send one request through the router.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send(Method::PATCH, uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
