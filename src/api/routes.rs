//! API Routes
//!
//! Configures the Axum router with all product API endpoints.

use std::time::Duration;

use axum::{
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_product, delete_product, get_product, health_handler, list_products, stats_handler,
    update_product, AppState,
};
use crate::error::attach_request_path;
use crate::rate_limit::rate_limit_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Rate limiting: token bucket per client, `/api` routes only
/// - Error bodies: request path added to every `ErrorResponse`
/// - CORS: any origin, standard CRUD methods, one hour preflight cache
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let api = Router::new()
        .route("/v1/products", get(list_products).post(create_product))
        .route(
            "/v1/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .nest("/api", api)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(attach_request_path))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-rate-limit-limit").is_none());
    }

    #[tokio::test]
    async fn test_list_endpoint_is_rate_limited() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-rate-limit-limit"], "20");
        assert_eq!(response.headers()["x-rate-limit-remaining"], "19");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/products/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_endpoint() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/products")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Lamp","description":"Desk lamp","price":19.5}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
