//! Rate Limiting Module
//!
//! Per-client token-bucket admission control for the API routes.

mod bucket;
mod identity;
mod limiter;
pub mod middleware;

#[cfg(test)]
mod property_tests;

pub use bucket::{AdmissionResult, TokenBucket};
pub use identity::{resolve_client_identity, IDENTITY_HEADERS};
pub use limiter::RateLimiter;
pub use middleware::rate_limit_middleware;
