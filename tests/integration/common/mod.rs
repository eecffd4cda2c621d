//! Common test utilities for integration tests
//!
//! - A fresh application per test, with the in-memory order store
//! - Request builders and response parsing
//! - Order fixtures driven through the public API

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use keepsake_common::Config;

/// Test application wrapping one composed router
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Application with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let router = keepsake_app::create_app(&config).unwrap();
        Self { router }
    }

    /// Send one request and return status plus parsed JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let resp = self
            .router
            .clone()
            .oneshot(json_request(method, uri, body))
            .await
            .unwrap();
        let status = resp.status();
        (status, parse_body(resp).await)
    }

    /// Create an order through the API and return its id
    pub async fn create_order(&self, status: Option<&str>) -> Uuid {
        let body = match status {
            Some(s) => json!({ "status": s }),
            None => json!({}),
        };
        let (code, order) = self.send(Method::POST, "/v1/orders", Some(body)).await;
        assert_eq!(code, StatusCode::CREATED, "create failed: {}", order);
        order["id"].as_str().unwrap().parse().unwrap()
    }

    /// Request a status change on behalf of a fresh actor with `role`
    pub async fn change_status(
        &self,
        order_id: Uuid,
        role: &str,
        new_status: &str,
    ) -> (StatusCode, Value) {
        let body = json!({
            "new_status": new_status,
            "actor_role": role,
            "actor_id": Uuid::new_v4(),
        });
        self.send(
            Method::PATCH,
            &format!("/v1/orders/{}/status", order_id),
            Some(body),
        )
        .await
    }
}

/// Helper: build a request, with a JSON body when given
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Helper: parse response body as JSON, `Null` for an empty or non-JSON body
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Helper: the `error.code` of an error response
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
