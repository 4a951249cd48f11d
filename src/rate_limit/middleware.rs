//! Admission middleware
//!
//! Runs the rate limiter in front of the wrapped routes and stamps the
//! rate-limit headers on every response, admitted or not.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::{resolve_client_identity, AdmissionResult, RateLimiter};
use crate::models::RateLimitExceededResponse;

pub const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-rate-limit-limit");
pub const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-rate-limit-remaining");
pub const RESET_HEADER: HeaderName = HeaderName::from_static("x-rate-limit-reset");

/// Admits or rejects the request before it reaches the handler.
///
/// Rejected requests get a 429 with a JSON error body.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = resolve_client_identity(request.headers(), remote_addr);

    let admission = limiter.admit(&identity);

    let mut response = if admission.allowed {
        next.run(request).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitExceededResponse::new()),
        )
            .into_response()
    };

    apply_rate_limit_headers(response.headers_mut(), &admission);
    response
}

/// Writes the limit, remaining and reset-seconds headers.
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, admission: &AdmissionResult) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(admission.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(admission.remaining_tokens));
    headers.insert(RESET_HEADER, HeaderValue::from(admission.reset_after_secs()));
}
