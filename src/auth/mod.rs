//! Cookie-based session authentication.
//!
//! Dual-token system: a short-lived access token and a long-lived refresh
//! token, both signed and stateless. When the access token stops verifying
//! but the refresh token is still good, the middleware silently issues a
//! fresh pair.

mod cookie;
mod engine;
mod errors;
mod identity;
mod session;
mod state;

pub use cookie::{ACCESS_COOKIE_NAME, CookieJar, CookieReadError, REFRESH_COOKIE_NAME};
pub use engine::{AuthEngine, AuthOutcome, Decision, Verified, authenticate, decide};
pub use errors::{ApiAuthError, AuthRejection};
pub use identity::{CurrentUser, Identity, MaybeUser};
pub use session::{CookieSettings, IssueError, SessionCookies};
pub use state::HasAuthEngine;
