//! Client identifier derivation for rate limiting.

use axum::http::HeaderMap;

/// Bucket shared by every request that carries neither proxy header.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Identify the client from proxy headers.
///
/// Preference: first `X-Forwarded-For` entry, then `X-Real-IP`, then
/// [`UNKNOWN_CLIENT`]. Blank values fall through to the next source.
pub fn client_id(headers: &HeaderMap) -> String {
    non_blank(headers, X_FORWARDED_FOR, |value| value.split(',').next())
        .or_else(|| non_blank(headers, X_REAL_IP, Some))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn non_blank<'a>(
    headers: &'a HeaderMap,
    name: &str,
    pick: impl FnOnce(&'a str) -> Option<&'a str>,
) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(pick)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}
