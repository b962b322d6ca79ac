#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use ecommerce_api::{AppState, app, config::Config, database::MemoryStore};
use serde_json::Value;
use tower::ServiceExt;

pub fn test_app() -> Router {
    test_app_with(Config::default())
}

pub fn test_app_with(config: Config) -> Router {
    app(AppState::with_store(Arc::new(MemoryStore::new()), config))
}

/// Sends one request through the router and decodes the JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    dispatch(app, request).await
}

/// Like `send`, but with a body that need not be valid JSON.
pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn create_user(app: &Router, email: &str, cpf: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        Some(serde_json::json!({ "email": email, "cpf": cpf })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

pub fn address_body(user_id: i64) -> Value {
    serde_json::json!({
        "user_id": user_id,
        "street": "Av. Paulista",
        "number": "1578",
        "neighborhood": "Bela Vista",
        "city": "São Paulo",
        "state": "SP",
        "zip_code": "01310-200"
    })
}
