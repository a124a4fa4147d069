//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use subscription_tracker::{build_app, db, AppState, InMemorySubscriptionRepository};

/// Application over an empty in-memory repository
pub fn test_app() -> (Router, Arc<InMemorySubscriptionRepository>) {
    let repository = Arc::new(InMemorySubscriptionRepository::new());
    let app = build_app(
        AppState::new(repository.clone()),
        Duration::from_secs(5),
    );
    (app, repository)
}

/// Send a request and decode the JSON response body (Null when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Connect to the test database and make sure the schema exists
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    db::ensure_schema(&pool).await.expect("Failed to create schema");
    assert!(db::check_schema(&pool).await.unwrap());

    pool
}
