//! Product API - Product CRUD service
//!
//! Serves a product resource over HTTP behind per-client token-bucket rate
//! limiting, with a read-through cache in front of the product store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod products;
pub mod rate_limit;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
