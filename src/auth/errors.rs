//! Authentication error types.

use axum::response::{IntoResponse, Response};

use super::cookie::CookieReadError;
use crate::api::error::ApiError;

/// Terminal failure raised by the engine before any handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// The `Cookie` header was present but unreadable
    CookieRead(CookieReadError),
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthRejection::CookieRead(e) => write!(f, "Failed to read session cookies: {}", e),
        }
    }
}

impl std::error::Error for AuthRejection {}

impl From<CookieReadError> for AuthRejection {
    fn from(e: CookieReadError) -> Self {
        AuthRejection::CookieRead(e)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiError::internal_error("JWT", self).into_response()
    }
}

/// Rejection for extractors that require an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAuthError {
    NotAuthenticated,
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        match self {
            ApiAuthError::NotAuthenticated => {
                ApiError::unauthorized("not found user profile").into_response()
            }
        }
    }
}
