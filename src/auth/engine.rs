//! Per-request authentication decisions.
//!
//! The engine reads the two session cookies, verifies them, and decides
//! whether to trust the access token, rotate the pair from the refresh
//! token, clear both cookies, or leave the request anonymous. Nothing is
//! stored server-side; every outcome is derived from the tokens alone.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::cookie::CookieJar;
use super::errors::AuthRejection;
use super::identity::Identity;
use super::session::SessionCookies;
use crate::jwt::{Claims, Profile, TokenError, TokenKind};

/// Outcome of verifying one cookie that was present.
pub type Verified = Result<Claims, TokenError>;

/// What to do with the request's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Access token is valid: bind its profile, touch no cookies
    Bind(Profile),
    /// Refresh token is valid: mint a new pair for this profile
    Rotate(Profile),
    /// Refresh token is unusable: drop both cookies
    Clear,
    /// Nothing usable, nothing to change
    Anonymous,
}

/// Decide from the access cookie and, lazily, the refresh cookie.
///
/// `refresh` is only called when the access cookie is absent or failed
/// validation; a malformed access token never consults it.
pub fn decide(access: Option<Verified>, refresh: impl FnOnce() -> Option<Verified>) -> Decision {
    match access {
        Some(Ok(claims)) => Decision::Bind(claims.profile()),
        Some(Err(e)) if !e.is_validation_failure() => Decision::Anonymous,
        Some(Err(_)) | None => match refresh() {
            Some(Ok(claims)) => Decision::Rotate(claims.profile()),
            Some(Err(_)) => Decision::Clear,
            None => Decision::Anonymous,
        },
    }
}

/// Result of a non-terminal authentication pass.
#[derive(Debug, Default)]
pub struct AuthOutcome {
    pub identity: Identity,
    /// `Set-Cookie` headers to attach to the response
    pub set_cookies: HeaderMap,
}

/// Verifies session cookies and rotates them when needed.
/// Shared read-only across all requests.
#[derive(Clone)]
pub struct AuthEngine {
    cookies: SessionCookies,
}

impl AuthEngine {
    pub fn new(cookies: SessionCookies) -> Self {
        Self { cookies }
    }

    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    /// Run the decision table for one request.
    ///
    /// Only an unreadable `Cookie` header is terminal; every other path
    /// lets the request continue, possibly anonymous.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthOutcome, AuthRejection> {
        let jar = CookieJar::from_headers(headers)?;
        let codec = self.cookies.codec();
        let settings = self.cookies.settings();

        let access = jar
            .get(&settings.access_name)
            .map(|token| codec.decode_kind(token, TokenKind::Access));
        let refresh = || {
            jar.get(&settings.refresh_name)
                .map(|token| codec.decode_kind(token, TokenKind::Refresh))
        };

        let decision = decide(access, refresh);
        tracing::debug!(?decision, "Session cookies evaluated");

        let mut outcome = AuthOutcome::default();
        match decision {
            Decision::Bind(profile) => outcome.identity = Identity::user(profile),
            Decision::Rotate(profile) => {
                match self.cookies.issue_pair(&profile, &mut outcome.set_cookies) {
                    Ok(()) => outcome.identity = Identity::user(profile),
                    // Retried on the next request
                    Err(e) => {
                        tracing::error!(action = "JWT", error = %e, "Failed to rotate session tokens")
                    }
                }
            }
            Decision::Clear => self.cookies.clear(&mut outcome.set_cookies),
            Decision::Anonymous => {}
        }
        Ok(outcome)
    }
}

/// Middleware that authenticates every request before it reaches a handler.
///
/// Binds the [`Identity`] into the request extensions and appends any
/// rotated or cleared cookies to the response.
pub async fn authenticate(
    State(engine): State<Arc<AuthEngine>>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match engine.authenticate(request.headers()) {
        Ok(outcome) => outcome,
        Err(rejection) => return rejection.into_response(),
    };

    request.extensions_mut().insert(outcome.identity);
    let mut response = next.run(request).await;

    if outcome.set_cookies.is_empty() {
        return response;
    }

    // Cookies set by the handler go last so they win over rotated ones (e.g. logout).
    let headers = response.headers_mut();
    let from_handler: Vec<HeaderValue> = headers.get_all(SET_COOKIE).iter().cloned().collect();
    headers.remove(SET_COOKIE);
    for value in outcome.set_cookies.get_all(SET_COOKIE) {
        headers.append(SET_COOKIE, value.clone());
    }
    for value in from_handler {
        headers.append(SET_COOKIE, value);
    }
    response
}
