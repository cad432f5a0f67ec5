//! Shared error handling for API endpoints.
//!
//! Every error leaves the service as `{"status": <u16>, "code": "<Code>"}`.
//! The detail message is logged, never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

/// API error type with automatic response conversion.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Log `e` under `action` and hide it behind a generic internal error.
    pub fn internal_error(action: &'static str, e: impl std::fmt::Display) -> Self {
        error!(action, error = %e, "Internal error");
        Self::Internal(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Internal(_) => "InternalServerError",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => msg,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    status: u16,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(
            status = status.as_u16(),
            code = self.code(),
            message = %self.message(),
            "Request failed"
        );
        (
            status,
            Json(ErrorResponse {
                status: status.as_u16(),
                code: self.code(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code() {
        let cases = [
            (ApiError::unauthorized("x"), StatusCode::UNAUTHORIZED, "Unauthorized"),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND, "NotFound"),
            (
                ApiError::internal_error("test", "boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
            assert_eq!(err.into_response().status(), status);
        }
    }
}
