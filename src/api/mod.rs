//! API module
//!
//! HTTP endpoints, middleware and application state.

pub mod middleware;
pub mod routes;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::store::SubscriptionRepository;

pub use routes::create_router;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn SubscriptionRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }
}

/// Build the full application: routes, middleware and state
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(create_router());

    with_middleware(routes, request_timeout).with_state(state)
}

/// Wrap routes in the request pipeline
// Note: Axum layers are applied in reverse order (last added = first executed)
// Order: trace -> timeout -> set request id -> propagate request id -> context -> logging -> catch panic -> handler
fn with_middleware(routes: Router<AppState>, request_timeout: Duration) -> Router<AppState> {
    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(middleware::logging_middleware))
        .layer(from_fn(middleware::request_context_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Turn a handler panic into the regular 500 error body
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal(format!("handler panicked: {}", message)).into_response()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::store::InMemorySubscriptionRepository;

    async fn explode() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500() {
        let state = AppState::new(Arc::new(InMemorySubscriptionRepository::new()));
        let app = with_middleware(
            Router::new().route("/explode", get(explode)),
            Duration::from_secs(5),
        )
        .with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_code"], "internal_error");
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = AppState::new(Arc::new(InMemorySubscriptionRepository::new()));
        let app = build_app(state, Duration::from_secs(5));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
