/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory store with cheap Argon2
/// parameters, and wraps request/response plumbing:
/// - JSON request helpers with optional session token
/// - Registration and login helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use contactbook_api::app::{build_router, AppState};
use contactbook_api::config::Config;
use contactbook_shared::repository::Repositories;
use serde_json::{json, Value};
use tower::Service as _;

/// Test context containing the router under test
pub struct TestContext {
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a fresh context with an empty in-memory store
    pub fn new() -> Self {
        let mut config = Config::default();
        config.security.argon2_memory_kib = 1024;
        config.security.argon2_iterations = 1;
        config.security.argon2_parallelism = 1;

        let app = build_router(AppState::new(Repositories::memory(), config));

        TestContext { app }
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", token);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("Non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    /// Registers `id` with password "secret"
    pub async fn register(&self, id: &str) {
        let (status, body) = self
            .send(
                "POST",
                "/api/users",
                None,
                Some(json!({ "id": id, "password": "secret", "name": format!("User {}", id) })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    }

    /// Logs `id` in and returns (token, refresh_token)
    pub async fn login(&self, id: &str) -> (String, String) {
        let (status, body) = self
            .send(
                "POST",
                "/api/users/_login",
                None,
                Some(json!({ "id": id, "password": "secret" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    /// Registers and logs in, returning the session token
    pub async fn session(&self, id: &str) -> String {
        self.register(id).await;
        self.login(id).await.0
    }

    /// Creates a contact and returns its id
    pub async fn create_contact(&self, token: &str, body: Value) -> String {
        let (status, body) = self.send("POST", "/api/contacts", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create contact failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
