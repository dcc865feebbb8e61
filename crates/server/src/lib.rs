//! Tany Foods ordering server library.
//!
//! This crate provides the HTTP service as a library, so the binary, the
//! CLI and the integration tests all build the same application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::json;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router around `state`.
pub fn build_app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 while any collection refuses writes because it could not be
/// read at startup.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let unverified = state.store().unverified();
    if unverified.is_empty() {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "unverified": unverified })),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AdminCredentials, ServerConfig};
    use crate::db::{DocumentBackend, MemoryBackend, Store};

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_string(),
            data_dir: std::env::temp_dir(),
            admin: AdminCredentials {
                username: "admin".to_string(),
                password_hash: SecretString::from(
                    crate::services::auth::hash_password("secret").unwrap(),
                ),
            },
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    async fn app_with(backend: MemoryBackend) -> Router {
        let backend: Arc<dyn DocumentBackend> = Arc::new(backend);
        let state = AppState::with_store(test_config(), Store::open(&backend))
            .await
            .unwrap();
        build_app(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(MemoryBackend::new()).await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_reports_unreadable_collection() {
        let app = app_with(MemoryBackend::new().with_unreadable("orders")).await;
        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["unverified"], json!(["orders"]));
    }

    #[tokio::test]
    async fn test_new_session_starts_on_login_page() {
        let app = app_with(MemoryBackend::new()).await;
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["page"], "login");
    }

    #[tokio::test]
    async fn test_catalog_requires_customer() {
        let app = app_with(MemoryBackend::new()).await;
        let response = app
            .oneshot(Request::get("/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_anonymous() {
        let app = app_with(MemoryBackend::new()).await;
        let response = app
            .oneshot(
                Request::get("/admin/orders/export.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_login_rejects_bad_credentials() {
        let app = app_with(MemoryBackend::new()).await;
        for body in ["username=admin&password=nope", "username=root&password=nope"] {
            let response = app
                .clone()
                .oneshot(
                    Request::post("/auth/admin/login")
                        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                body_json(response).await["error"],
                "Invalid admin credentials"
            );
        }
    }

    #[tokio::test]
    async fn test_signup_validation_message() {
        let app = app_with(MemoryBackend::new()).await;
        let response = app
            .oneshot(
                Request::post("/auth/signup")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "first_name=Ann&last_name=Lee&company_name=Acme&email=ann%40acme.com\
                         &password=pw1&confirm_password=pw2",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Passwords do not match");
    }
}
