//! Router configuration for the web API.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_reply, create_thread, delete_reply, delete_thread, get_thread, list_threads,
    report_reply, report_thread, AppState,
};
use super::middleware::{create_cors_layer, security_headers, write_rate_limit, RateLimitState};
use crate::config::WebConfig;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let rate_limit_state = Arc::new(
        RateLimitState::new(config.write_rate_limit)
            .trust_proxy_headers(config.trust_proxy_headers),
    );
    create_router_with_rate_limit(app_state, config, rate_limit_state)
}

/// Create the main API router with an existing rate limit state.
pub fn create_router_with_rate_limit(
    app_state: Arc<AppState>,
    config: &WebConfig,
    rate_limit_state: Arc<RateLimitState>,
) -> Router {
    let api_routes = Router::new()
        .route(
            "/threads/:board",
            get(list_threads)
                .post(create_thread)
                .put(report_thread)
                .delete(delete_thread),
        )
        .route(
            "/replies/:board",
            get(get_thread)
                .post(create_reply)
                .put(report_reply)
                .delete(delete_reply),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let state = rate_limit_state.clone();
                    write_rate_limit(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Hasher;
    use crate::config::SecurityConfig;
    use crate::Database;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_router() {
        let response = create_health_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let db = Database::open_in_memory().await.unwrap();
        let hasher = Hasher::new(&SecurityConfig::default()).unwrap();
        let router = create_router(
            Arc::new(AppState::new(db, hasher)),
            &WebConfig::default(),
        );

        let response = router
            .oneshot(Request::builder().uri("/api/boards").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
