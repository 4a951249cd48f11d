//! Response DTOs for the product API
//!
//! Defines the structure of outgoing HTTP response bodies.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::products::Product;

/// Product as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Client identities with a live token bucket
    pub tracked_clients: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, tracked_clients: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            tracked_clients,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// One failed validation check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response body for 4xx/5xx conditions raised by handlers
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    pub status: u16,
    /// Canonical reason phrase for `status`
    pub error: String,
    pub message: String,
    /// Request path, filled in by the router
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(status: StatusCode, message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            path: None,
            details,
        }
    }

    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }
}

/// Body of a 429 rejection
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitExceededResponse {
    pub error: &'static str,
}

impl RateLimitExceededResponse {
    pub const MESSAGE: &'static str = "Rate limit exceeded. Please try again later.";

    pub fn new() -> Self {
        Self {
            error: Self::MESSAGE,
        }
    }
}

impl Default for RateLimitExceededResponse {
    fn default() -> Self {
        Self::new()
    }
}
