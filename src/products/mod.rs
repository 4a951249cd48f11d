//! Products Module
//!
//! The product domain type, the store seam it is persisted through, and the
//! read-through caching service the HTTP layer talks to.

mod model;
mod repository;
mod service;


pub use model::Product;
pub use repository::{InMemoryProductStore, ProductStore};
pub use service::{CacheKey, CachedValue, ProductCache, ProductService};
