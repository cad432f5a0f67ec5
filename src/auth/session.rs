//! Issuing and clearing the session cookie pair.

use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};

use super::cookie::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::jwt::{Profile, SigningError, TokenCodec, TokenKind};

/// Names and attributes of the two session cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub access_name: String,
    pub refresh_name: String,
    /// Whether to set the Secure flag (should be true in production with HTTPS)
    pub secure: bool,
    pub path: String,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            access_name: ACCESS_COOKIE_NAME.to_string(),
            refresh_name: REFRESH_COOKIE_NAME.to_string(),
            secure: true,
            path: "/".to_string(),
        }
    }
}

impl CookieSettings {
    fn render(&self, name: &str, value: &str, max_age: u64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{}={}; HttpOnly; SameSite=Strict; Path={}; Max-Age={}{}",
            name, value, self.path, max_age, secure
        )
    }
}

/// Errors that can occur while issuing the cookie pair.
#[derive(Debug)]
pub enum IssueError {
    /// A token could not be minted
    Signing(SigningError),
    /// A cookie could not be rendered as a header value
    InvalidHeader(InvalidHeaderValue),
}

impl std::fmt::Display for IssueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueError::Signing(e) => write!(f, "{}", e),
            IssueError::InvalidHeader(e) => write!(f, "Cookie is not a valid header value: {}", e),
        }
    }
}

impl std::error::Error for IssueError {}

impl From<SigningError> for IssueError {
    fn from(e: SigningError) -> Self {
        IssueError::Signing(e)
    }
}

impl From<InvalidHeaderValue> for IssueError {
    fn from(e: InvalidHeaderValue) -> Self {
        IssueError::InvalidHeader(e)
    }
}

/// Mints and clears the access + refresh cookie pair.
#[derive(Clone)]
pub struct SessionCookies {
    codec: TokenCodec,
    settings: CookieSettings,
}

impl SessionCookies {
    pub fn new(codec: TokenCodec, settings: CookieSettings) -> Self {
        Self { codec, settings }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn settings(&self) -> &CookieSettings {
        &self.settings
    }

    /// Mint a fresh token pair for `profile` and append both `Set-Cookie` headers.
    /// Either both cookies are appended or, on error, neither is.
    pub fn issue_pair(
        &self,
        profile: &Profile,
        headers: &mut HeaderMap,
    ) -> Result<(), IssueError> {
        let lifetimes = self.codec.lifetimes();
        let access = self.codec.encode(profile, TokenKind::Access)?;
        let refresh = self.codec.encode(profile, TokenKind::Refresh)?;

        let access = self.header_value(&self.settings.access_name, &access, lifetimes.access)?;
        let refresh =
            self.header_value(&self.settings.refresh_name, &refresh, lifetimes.refresh)?;

        headers.append(header::SET_COOKIE, access);
        headers.append(header::SET_COOKIE, refresh);
        Ok(())
    }

    /// Append expired, empty cookies for both names so the client drops them.
    pub fn clear(&self, headers: &mut HeaderMap) {
        for name in [&self.settings.access_name, &self.settings.refresh_name] {
            match self.header_value(name, "", 0) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(_) => tracing::warn!(cookie = %name, "Cookie name is not a valid header value"),
            }
        }
    }

    fn header_value(
        &self,
        name: &str,
        value: &str,
        max_age: u64,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.settings.render(name, value, max_age))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenLifetimes;

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .collect()
    }

    fn token_from(cookie: &str) -> &str {
        let (_, rest) = cookie.split_once('=').unwrap();
        rest.split(';').next().unwrap()
    }

    fn bob() -> Profile {
        Profile::new("user-7", "bob", None)
    }

    #[test]
    fn test_issue_pair_sets_both_cookies() {
        let codec = TokenCodec::new(b"test-secret", TokenLifetimes::default());
        let cookies = SessionCookies::new(codec.clone(), CookieSettings::default());

        let mut headers = HeaderMap::new();
        cookies.issue_pair(&bob(), &mut headers).unwrap();

        let written = set_cookies(&headers);
        assert_eq!(written.len(), 2);

        let access = written
            .iter()
            .find(|c| c.starts_with("access_token="))
            .unwrap();
        let refresh = written
            .iter()
            .find(|c| c.starts_with("refresh_token="))
            .unwrap();

        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Strict"));
        assert!(access.contains("Path=/"));
        assert!(access.contains("Secure"));
        assert!(access.contains(&format!("Max-Age={}", TokenLifetimes::default().access)));
        assert!(refresh.contains(&format!("Max-Age={}", TokenLifetimes::default().refresh)));

        let access_claims = codec.decode(token_from(access)).unwrap();
        let refresh_claims = codec.decode(token_from(refresh)).unwrap();
        assert_eq!(access_claims.kind, TokenKind::Access);
        assert_eq!(refresh_claims.kind, TokenKind::Refresh);
        assert_eq!(access_claims.profile(), bob());
        assert_eq!(refresh_claims.profile(), bob());
    }

    #[test]
    fn test_issue_pair_failure_writes_nothing() {
        let codec = TokenCodec::verify_only(b"test-secret", TokenLifetimes::default());
        let cookies = SessionCookies::new(codec, CookieSettings::default());

        let mut headers = HeaderMap::new();
        let result = cookies.issue_pair(&bob(), &mut headers);

        assert!(matches!(
            result,
            Err(IssueError::Signing(SigningError::KeyUnavailable))
        ));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_clear_expires_both_cookies() {
        let codec = TokenCodec::new(b"test-secret", TokenLifetimes::default());
        let cookies = SessionCookies::new(codec, CookieSettings::default());

        let mut headers = HeaderMap::new();
        cookies.clear(&mut headers);

        let written = set_cookies(&headers);
        assert_eq!(
            written,
            vec![
                "access_token=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; Secure".to_string(),
                "refresh_token=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; Secure".to_string(),
            ]
        );
    }

    #[test]
    fn test_unrenderable_cookie_is_an_issue_error() {
        let codec = TokenCodec::new(b"test-secret", TokenLifetimes::default());
        let settings = CookieSettings {
            path: "/\n".into(),
            ..CookieSettings::default()
        };
        let cookies = SessionCookies::new(codec, settings);

        let mut headers = HeaderMap::new();
        let result = cookies.issue_pair(&bob(), &mut headers);

        assert!(matches!(result, Err(IssueError::InvalidHeader(_))));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_custom_names_and_insecure() {
        let codec = TokenCodec::new(b"test-secret", TokenLifetimes::default());
        let settings = CookieSettings {
            access_name: "sid".into(),
            refresh_name: "rid".into(),
            secure: false,
            path: "/app".into(),
        };
        let cookies = SessionCookies::new(codec, settings);

        let mut headers = HeaderMap::new();
        cookies.issue_pair(&bob(), &mut headers).unwrap();

        let written = set_cookies(&headers);
        assert!(written[0].starts_with("sid="));
        assert!(written[1].starts_with("rid="));
        assert!(written.iter().all(|c| c.contains("Path=/app")));
        assert!(written.iter().all(|c| !c.contains("Secure")));
    }
}
