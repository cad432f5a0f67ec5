//! Request-scoped identity and the extractors that read it.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::ApiAuthError;
use crate::jwt::Profile;

/// The verified caller of the current request, or anonymous.
///
/// Inserted into the request extensions exactly once by the
/// [`authenticate`](super::authenticate) middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity(Option<Profile>);

impl Identity {
    pub fn user(profile: Profile) -> Self {
        Self(Some(profile))
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.0.as_ref()
    }
}

/// Optional authentication extractor - never fails.
/// Requests that did not pass through the middleware are anonymous.
pub struct MaybeUser(pub Option<Profile>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let profile = parts
            .extensions
            .get::<Identity>()
            .and_then(|identity| identity.profile().cloned());
        Ok(MaybeUser(profile))
    }
}

/// Extractor for endpoints that require an authenticated caller.
pub struct CurrentUser(pub Profile);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(profile) = match MaybeUser::from_request_parts(parts, state).await {
            Ok(user) => user,
            Err(never) => match never {},
        };
        profile.map(CurrentUser).ok_or(ApiAuthError::NotAuthenticated)
    }
}
