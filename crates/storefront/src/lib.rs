//! Bazaar Storefront library.
//!
//! This crate provides the storefront as a library so the router can be
//! driven from integration tests as well as from the binary.
//!
//! # Architecture
//!
//! - Axum web framework with plain form posts and redirects
//! - Askama templates for server-side rendering
//! - Product catalog fetched over HTTP and cached in memory
//! - Cart, notifications and login state kept in the session
//! - Demo accounts stored in a local JSON file

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the full storefront router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(trace_layer)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{CatalogConfig, StorefrontConfig};
    use crate::middleware::request_id::REQUEST_ID_HEADER;

    fn test_app() -> Router {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from("static"),
            catalog: CatalogConfig::with_base_url("http://127.0.0.1:9").unwrap(),
            users_file: std::env::temp_dir()
                .join(format!("bazaar-app-{}", uuid::Uuid::new_v4()))
                .join("users.json"),
            checkout_delay: Duration::ZERO,
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config).unwrap())
    }

    async fn get(uri: &str) -> axum::response::Response {
        test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_welcome_redirects_anonymous_visitors() {
        let response = get("/welcome").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_malformed_product_id_is_not_found() {
        let response = get("/products/not-a-number").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Product not found"));
    }

    #[tokio::test]
    async fn test_fresh_session_has_empty_cart() {
        let response = get("/cart/count").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(">0<"));

        let response = get("/checkout").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Your cart is empty"));
    }

    #[tokio::test]
    async fn test_upstream_request_id_is_echoed() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(REQUEST_ID_HEADER, "edge-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "edge-123");
    }
}
