//! Session API endpoints.
//!
//! - GET `/` - Current user profile, or `null` when anonymous
//! - GET `/verify` - 200 when authenticated, 401 otherwise
//! - DELETE `/` - Log out by clearing both session cookies

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use std::sync::Arc;

use crate::auth::{AuthEngine, CurrentUser, HasAuthEngine, MaybeUser};
use crate::impl_has_auth_engine;

#[derive(Clone)]
pub struct SessionState {
    pub engine: Arc<AuthEngine>,
}

impl_has_auth_engine!(SessionState);

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/", get(current_profile).delete(logout))
        .route("/verify", get(verify_session))
        .with_state(state)
}

async fn current_profile(MaybeUser(profile): MaybeUser) -> impl IntoResponse {
    Json(profile)
}

/// Lightweight check for clients that only need to know whether they are signed in.
async fn verify_session(CurrentUser(_profile): CurrentUser) -> impl IntoResponse {
    StatusCode::OK
}

async fn logout(
    State(state): State<SessionState>,
    CurrentUser(profile): CurrentUser,
) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    state.engine().cookies().clear(&mut headers);
    tracing::info!(user_id = %profile.user_id, "User logged out");

    (headers, Json(json!({})))
}
