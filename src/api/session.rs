//! Admin session cookie and request metadata helpers.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use std::time::Duration;

use crate::auth::CookieCodec;

pub const SESSION_COOKIE_NAME: &str = "altar_admin";

/// Client id used for rate limiting when no proxy header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Build the `HttpOnly` admin cookie carrying a signed token.
pub fn session_cookie(
    token: &str,
    ttl: Duration,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = ttl.as_secs();
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                let val = val.trim();
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}

/// Extract the client id for rate limiting from common proxy headers.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// True when the request carries a valid admin session cookie.
pub fn require_admin(headers: &HeaderMap, codec: &CookieCodec) -> bool {
    extract_session_token(headers).is_some_and(|token| codec.is_authenticated(&token))
}
