//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A fresh in-memory database per test, migrated
//! - The full router with test configuration
//! - Request helpers for JSON, form and authenticated calls

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use sqlx::SqlitePool;
use ticketdesk_api::app::{build_router, AppState};
use ticketdesk_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use ticketdesk_shared::db::migrations::run_migrations;
use ticketdesk_shared::db::pool::{self, create_pool};
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origin: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                access_token_expire_minutes: 30,
            },
        };

        let db = create_pool(pool::DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(Self { db, app, config })
    }

    /// Sends a request through the router and decodes the JSON body
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends a request with an optional JSON body and bearer token
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), token).await
    }

    pub async fn put(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, token).await
    }

    /// Posts the login form
    pub async fn login_raw(&self, username: &str, password: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                username, password
            )))
            .unwrap();

        self.send(request).await
    }

    /// Registers a user with a derived email and returns the response body
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let response = self
            .post(
                "/users/",
                serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": password,
                }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "register: {}", response.body);
        response.body
    }

    /// Logs in and returns the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self.login_raw(username, password).await;
        assert_eq!(response.status, StatusCode::OK, "login: {}", response.body);
        response.body["access_token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in, returning the token
    pub async fn signup(&self, username: &str) -> String {
        self.register(username, "correct-horse").await;
        self.login(username, "correct-horse").await
    }

    /// Creates a ticket and returns its JSON
    pub async fn create_ticket(&self, token: &str, title: &str) -> Value {
        let response = self
            .post(
                "/tickets/",
                serde_json::json!({
                    "title": title,
                    "description": "Receipt printer jams on every order",
                    "platform": "android",
                    "username": "front-desk",
                    "restaurant_branch": "Harbour Street",
                }),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "create ticket: {}", response.body);
        response.body
    }
}
