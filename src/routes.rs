//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`   - Health check: DB, cache, export queue
//! - `GET /metrics`  - Prometheus exposition
//! - everything else - registry API, see [`crate::api::routes::registry_routes`]
//!
//! # Middleware
//!
//! - **Metrics** - request counter and latency histogram per matched route
//! - **Tracing** - Structured request/response logging
//! - **CORS** - permissive
//! - **Body limit** - multipart uploads up to `UPLOAD_MAX_BYTES`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, metrics_handler};
use crate::api::middleware::{metrics, tracing};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// `upload_max_bytes` caps request bodies, which bounds CSV uploads.
pub fn app_router(state: AppState, upload_max_bytes: usize) -> NormalizePath<Router> {
    let router = api::routes::registry_routes()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(metrics::track))
        .with_state(state)
        .layer(DefaultBodyLimit::max(upload_max_bytes))
        .layer(CorsLayer::permissive())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        MockFilterRepository, MockOwnershipRepository, MockPatentRepository,
        MockPersonRepository,
    };
    use crate::infrastructure::cache::NullCache;
    use crate::state::{Repositories, StateOptions};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn app(filters: MockFilterRepository) -> NormalizePath<Router> {
        let repos = Repositories {
            patents: Arc::new(MockPatentRepository::new()),
            persons: Arc::new(MockPersonRepository::new()),
            ownerships: Arc::new(MockOwnershipRepository::new()),
            filters: Arc::new(filters),
        };
        let (tx, _rx) = mpsc::channel(1);
        let state = AppState::new(
            repos,
            Arc::new(NullCache::new()),
            tx,
            PrometheusBuilder::new().build_recorder().handle(),
            StateOptions {
                cache_ttl_seconds: 60,
                export_timeout: Duration::from_secs(1),
            },
        );
        app_router(state, 1024)
    }

    #[tokio::test]
    async fn test_trailing_slash_and_cors() {
        let mut filters = MockFilterRepository::new();
        filters.expect_list().times(1).returning(|| Ok(vec![]));

        let response = app(filters)
            .oneshot(
                Request::get("/filters/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut filters = MockFilterRepository::new();
        filters.expect_create().never();
        let entries: Vec<String> = (0..200).map(|i| format!("77{i:08}")).collect();
        let body = serde_json::to_vec(&serde_json::json!({ "tax_numbers": entries })).unwrap();

        let response = app(filters)
            .oneshot(
                Request::post("/filters")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_metrics_route_renders() {
        let response = app(MockFilterRepository::new())
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
