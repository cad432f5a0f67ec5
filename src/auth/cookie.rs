//! Cookie parsing utilities for authentication.

use axum::http::{HeaderMap, header};

/// Default cookie name for the access token.
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Default cookie name for the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// The request's cookies, parsed once from every `Cookie` header.
#[derive(Debug, Default)]
pub struct CookieJar<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> CookieJar<'a> {
    /// Parse all `Cookie` headers. A missing header is an empty jar;
    /// a header that cannot be read is an error. Segments that are not
    /// `name=value` pairs are skipped.
    pub fn from_headers(headers: &'a HeaderMap) -> Result<Self, CookieReadError> {
        let mut pairs = Vec::new();
        for value in headers.get_all(header::COOKIE) {
            let value = value.to_str().map_err(|_| CookieReadError::InvalidHeader)?;
            for part in value.split(';') {
                let Some((key, value)) = part.split_once('=') else {
                    continue;
                };
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                pairs.push((key, value.trim()));
            }
        }
        Ok(Self { pairs })
    }

    /// The first cookie called `name`, if any.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

/// The `Cookie` header was present but could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieReadError {
    /// Header bytes are not visible ASCII
    InvalidHeader,
}

impl std::fmt::Display for CookieReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CookieReadError::InvalidHeader => write!(f, "Cookie header contains invalid bytes"),
        }
    }
}

impl std::error::Error for CookieReadError {}
