//! API Handlers
//!
//! HTTP request handlers for each product API endpoint.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, ProductRequest, ProductResponse, StatsResponse};
use crate::products::{InMemoryProductStore, ProductCache, ProductService, ProductStore};
use crate::rate_limit::RateLimiter;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cached product operations
    pub products: Arc<ProductService>,
    /// Per-client admission control for `/api`
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(products: ProductService, rate_limiter: RateLimiter) -> Self {
        Self {
            products: Arc::new(products),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// Creates a new AppState from configuration, backed by `store`.
    pub fn with_store(config: &Config, store: Arc<dyn ProductStore>) -> Self {
        let cache = ProductCache::new(config.cache_max_entries, config.cache_ttl());
        let limiter = RateLimiter::new(
            config.rate_limit_capacity,
            config.rate_limit_refill_interval(),
        );
        Self::new(ProductService::new(store, cache), limiter)
    }

    /// Creates a new AppState from configuration with an in-memory store.
    pub fn from_config(config: &Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryProductStore::new()))
    }
}

// Extractor failures are turned into `ApiError` so they share the error body
type ProductId = std::result::Result<Path<Uuid>, PathRejection>;
type ProductBody = std::result::Result<Json<ProductRequest>, JsonRejection>;

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Product not found with id: {}", id))
}

fn validate(req: &ProductRequest) -> Result<()> {
    let errors = req.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Handler for GET /api/v1/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.products.get_all().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Handler for GET /api/v1/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    id: ProductId,
) -> Result<Json<ProductResponse>> {
    let Path(id) = id?;
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(product.into()))
}

/// Handler for POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    body: ProductBody,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let Json(req) = body?;
    validate(&req)?;

    let product = state.products.create(req.into_new_product()).await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Handler for PUT /api/v1/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    id: ProductId,
    body: ProductBody,
) -> Result<Json<ProductResponse>> {
    let Path(id) = id?;
    let Json(req) = body?;
    validate(&req)?;

    let product = state
        .products
        .update(id, req.into_product(id))
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(product.into()))
}

/// Handler for DELETE /api/v1/products/:id
pub async fn delete_product(State(state): State<AppState>, id: ProductId) -> Result<StatusCode> {
    let Path(id) = id?;
    if state.products.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.products.cache_stats().await;
    Json(StatsResponse::new(&stats, state.rate_limiter.tracked_clients()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::from_config(&Config::default())
    }

    fn request(name: &str, price: f64) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            description: format!("{name} description"),
            price,
        }
    }

    fn body(name: &str, price: f64) -> ProductBody {
        Ok(Json(request(name, price)))
    }

    fn id(id: Uuid) -> ProductId {
        Ok(Path(id))
    }

    #[tokio::test]
    async fn test_create_and_get_handler() {
        let state = state();

        let (status, Json(created)) = create_product(State(state.clone()), body("Lamp", 5.0))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_product(State(state), id(created.id)).await.unwrap();
        assert_eq!(fetched.name, "Lamp");
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_get_nonexistent_product() {
        let result = get_product(State(state()), id(Uuid::new_v4())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_request() {
        let result = create_product(State(state()), body("", -1.0)).await;
        match result {
            Err(ApiError::Validation(errors)) => assert_eq!(errors.len(), 2),
            _ => panic!("expected validation error"),
        }
    }

    #[tokio::test]
    async fn test_update_nonexistent_product() {
        let result = update_product(State(state()), id(Uuid::new_v4()), body("X", 1.0)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = state();
        let (_, Json(created)) = create_product(State(state.clone()), body("Lamp", 5.0))
            .await
            .unwrap();

        let status = delete_product(State(state.clone()), id(created.id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let again = delete_product(State(state), id(created.id)).await;
        assert!(matches!(again, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state();
        list_products(State(state.clone())).await.unwrap();
        list_products(State(state.clone())).await.unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.tracked_clients, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
