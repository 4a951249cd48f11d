//! API Module
//!
//! HTTP handlers and routing for the product REST API.
//!
//! # Endpoints
//! - `GET /api/v1/products` - List products
//! - `POST /api/v1/products` - Create a product
//! - `GET /api/v1/products/:id` - Fetch a product
//! - `PUT /api/v1/products/:id` - Replace a product
//! - `DELETE /api/v1/products/:id` - Delete a product
//! - `GET /stats` - Cache and rate limiter statistics
//! - `GET /health` - Health check endpoint
//!
//! Everything under `/api` is rate limited per client.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
