#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use std::time::{SystemTime, UNIX_EPOCH};
use tokenpair::{
    ServerConfig,
    auth::CookieSettings,
    create_app,
    jwt::{Profile, TokenCodec, TokenKind, TokenLifetimes},
};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-for-testing-only!";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        base: None,
        jwt_secret: TEST_SECRET.to_vec(),
        lifetimes: TokenLifetimes::default(),
        cookies: CookieSettings {
            // Tests run on localhost HTTP
            secure: false,
            ..CookieSettings::default()
        },
    }
}

/// Create a test app and the codec that shares its secret.
pub fn create_test_app() -> (Router, TokenCodec) {
    let config = test_config();
    let codec = TokenCodec::new(&config.jwt_secret, config.lifetimes);
    (create_app(&config), codec)
}

pub fn alice() -> Profile {
    Profile::new(
        "7b0c3f4e-1111-4a5b-9c1d-000000000001",
        "alice",
        Some("https://images.example.com/alice.png".to_string()),
    )
}

pub fn bob() -> Profile {
    Profile::new("7b0c3f4e-2222-4a5b-9c1d-000000000002", "bob", None)
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn valid_token(codec: &TokenCodec, profile: &Profile, kind: TokenKind) -> String {
    codec.encode(profile, kind).unwrap()
}

/// A correctly signed token whose lifetime ran out a minute ago.
pub fn expired_token(codec: &TokenCodec, profile: &Profile, kind: TokenKind) -> String {
    let ttl = codec.lifetimes().for_kind(kind);
    codec.encode_at(profile, kind, now() - ttl - 60).unwrap()
}

/// A correctly shaped token signed with a different secret.
pub fn foreign_token(profile: &Profile, kind: TokenKind) -> String {
    TokenCodec::new(b"some-other-secret", TokenLifetimes::default())
        .encode(profile, kind)
        .unwrap()
}

pub fn auth_cookies(access_token: &str, refresh_token: &str) -> String {
    format!(
        "access_token={}; refresh_token={}",
        access_token, refresh_token
    )
}

pub async fn fetch(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    send(app, "GET", uri, cookie).await
}

pub async fn send(app: Router, method: &str, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Extract Set-Cookie headers from response
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Token value of the cookie called `name`, ignoring cleared cookies.
pub fn issued_token(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    cookies
        .iter()
        .filter(|c| c.starts_with(&prefix) && !c.contains("Max-Age=0"))
        .map(|c| c[prefix.len()..].split(';').next().unwrap_or("").to_string())
        .last()
}

/// Check if cookies contain a token being cleared (Max-Age=0)
pub fn has_cleared_cookie(cookies: &[String], cookie_name: &str) -> bool {
    let prefix = format!("{}=;", cookie_name);
    cookies
        .iter()
        .any(|c| c.starts_with(&prefix) && c.contains("Max-Age=0"))
}
