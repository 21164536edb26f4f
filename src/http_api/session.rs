//! Signed session cookie and the login gate.
//!
//! The cookie carries the hex-encoded username and an HMAC-SHA256 tag keyed
//! by the configured secret. Nothing is kept server side.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use super::{ApiError, AppState};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";

fn session_mac(secret: &str, username: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(username.as_bytes());
    Some(mac)
}

pub fn sign_session(secret: &str, username: &str) -> Option<String> {
    let tag = session_mac(secret, username)?.finalize().into_bytes();
    Some(format!("{}.{}", hex::encode(username), hex::encode(tag)))
}

/// Returns the username carried by a correctly signed cookie value.
pub fn verify_session(secret: &str, value: &str) -> Option<String> {
    let (user_hex, tag_hex) = value.trim().split_once('.')?;
    let username = String::from_utf8(hex::decode(user_hex).ok()?).ok()?;
    let tag = hex::decode(tag_hex).ok()?;
    session_mac(secret, &username)?.verify_slice(&tag).ok()?;
    Some(username)
}

pub fn session_cookie(value: &str) -> String {
    format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Username of the signed-in user, if the request carries a valid session
/// for the currently configured account.
pub fn session_user(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let config = state.config();
    let value = cookie_value(headers, SESSION_COOKIE)?;
    let username = verify_session(&config.secret_key, value)?;
    (username == config.username).then_some(username)
}

pub(crate) async fn require_login(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if session_user(&state, request.headers()).is_some() {
        return next.run(request).await;
    }
    let path = request.uri().path();
    debug!(path, "rejecting request without a valid session");
    if path.starts_with("/api/") {
        ApiError::unauthorized("login required").into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn signed_value_verifies_with_same_secret_only() {
        let value = sign_session("secret-a", "teacher").unwrap();
        assert_eq!(verify_session("secret-a", &value), Some("teacher".to_string()));
        assert_eq!(verify_session("secret-b", &value), None);
    }

    #[test]
    fn cookie_value_is_hex_username_dot_hex_tag() {
        let value = sign_session("secret", "Ms; Smith").unwrap();
        let (user_hex, tag_hex) = value.split_once('.').unwrap();
        assert_eq!(user_hex, hex::encode("Ms; Smith"));
        assert_eq!(tag_hex.len(), 64);
        assert!(value.chars().all(|c| c == '.' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn tampered_values_are_rejected() {
        let value = sign_session("secret", "teacher").unwrap();
        let (_, tag) = value.split_once('.').unwrap();
        let forged = format!("{}.{}", hex::encode("admin"), tag);
        assert_eq!(verify_session("secret", &forged), None);
        assert_eq!(verify_session("secret", "not-a-cookie"), None);
        assert_eq!(verify_session("secret", ""), None);
    }

    #[test]
    fn cookie_value_finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc.def; lang=en"),
        );
        assert_eq!(cookie_value(&headers, "session"), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
