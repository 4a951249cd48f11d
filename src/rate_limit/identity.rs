//! Client identity resolution.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Headers consulted before falling back to the peer address, in order.
pub const IDENTITY_HEADERS: [&str; 3] = ["X-Forwarded-For", "Proxy-Client-IP", "WL-Proxy-Client-IP"];

/// Returns the rate-limiting key for a request.
///
/// Proxy headers win over the raw connection address. A header is skipped when
/// it is missing, empty, not valid visible ASCII, or `unknown` in any case.
/// `X-Forwarded-For` is used as a whole, not split on commas. With no usable
/// source the identity is the empty string.
pub fn resolve_client_identity(headers: &HeaderMap, remote_addr: Option<SocketAddr>) -> String {
    IDENTITY_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| is_usable(value))
        .map(str::to_owned)
        .or_else(|| remote_addr.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}

fn is_usable(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case("unknown")
}
