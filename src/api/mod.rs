pub mod error;
mod session;

use axum::{Router, middleware};
use std::sync::Arc;

use crate::auth::{AuthEngine, authenticate};
use error::ApiError;

pub use session::SessionState;

/// Create the API router. Every route sits behind the session middleware.
pub fn create_api_router(engine: Arc<AuthEngine>) -> Router {
    let session_state = session::SessionState {
        engine: engine.clone(),
    };

    Router::new()
        .nest("/v1/auth", session::router(session_state))
        .fallback(|| async { ApiError::not_found("No such route") })
        .layer(middleware::from_fn_with_state(engine, authenticate))
}
