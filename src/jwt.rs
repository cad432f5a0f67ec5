//! JWT token generation and validation.
//!
//! Both session tokens share one claim set and one signing key; the `typ`
//! claim tells an access token from a refresh token.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived access token
    Access,
    /// Long-lived refresh token, only used to mint a new pair
    Refresh,
}

/// The externally visible identity carried in tokens and in the request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub photo_url: Option<String>,
}

impl Profile {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        photo_url: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            photo_url,
        }
    }
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Display name
    pub username: String,
    /// Avatar reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Token type
    #[serde(rename = "typ")]
    pub kind: TokenKind,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    pub fn profile(&self) -> Profile {
        Profile {
            user_id: self.sub.clone(),
            username: self.username.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// Access token duration: 5 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 5 * 60;

/// Refresh token duration: 30 days
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// How long each kind of token stays valid, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: u64,
    pub refresh: u64,
}

impl TokenLifetimes {
    pub fn for_kind(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.access,
            TokenKind::Refresh => self.refresh,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: ACCESS_TOKEN_DURATION_SECS,
            refresh: REFRESH_TOKEN_DURATION_SECS,
        }
    }
}

/// Key material, built once at startup and never mutated.
/// A verify-only instance has no encoding key.
struct SigningKeys {
    encoding: Option<EncodingKey>,
    decoding: DecodingKey,
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<SigningKeys>,
    lifetimes: TokenLifetimes,
}

impl TokenCodec {
    /// Create a codec that can both sign and verify with the given secret.
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            keys: Arc::new(SigningKeys {
                encoding: Some(EncodingKey::from_secret(secret)),
                decoding: DecodingKey::from_secret(secret),
            }),
            lifetimes,
        }
    }

    /// Create a codec that verifies tokens but cannot mint new ones.
    pub fn verify_only(secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            keys: Arc::new(SigningKeys {
                encoding: None,
                decoding: DecodingKey::from_secret(secret),
            }),
            lifetimes,
        }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Sign a token for `profile` that expires after the lifetime of `kind`.
    pub fn encode(&self, profile: &Profile, kind: TokenKind) -> Result<String, SigningError> {
        self.encode_at(profile, kind, now_secs()?)
    }

    /// Sign a token as if it had been issued at `issued_at` (Unix seconds).
    pub fn encode_at(
        &self,
        profile: &Profile,
        kind: TokenKind,
        issued_at: u64,
    ) -> Result<String, SigningError> {
        let key = self
            .keys
            .encoding
            .as_ref()
            .ok_or(SigningError::KeyUnavailable)?;

        let claims = Claims {
            sub: profile.user_id.clone(),
            username: profile.username.clone(),
            photo_url: profile.photo_url.clone(),
            kind,
            iat: issued_at,
            exp: issued_at.saturating_add(self.lifetimes.for_kind(kind)),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(SigningError::Encoding)
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::from_jwt(&e))
    }

    /// Like [`decode`](Self::decode), but a token of the other kind is rejected
    /// as untrustworthy.
    pub fn decode_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.kind != kind {
            return Err(TokenError::SignatureInvalid);
        }
        Ok(claims)
    }
}

fn now_secs() -> Result<u64, SigningError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| SigningError::TimeError)
}

/// Why a token could not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but the expiry has passed
    Expired,
    /// Signature does not verify, or a claim other than expiry was rejected
    SignatureInvalid,
    /// Not a token at all
    Malformed,
}

impl TokenError {
    /// Expired and badly-signed tokens were at least structurally tokens.
    /// Only those are allowed to trigger a refresh.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, TokenError::Expired | TokenError::SignatureInvalid)
    }

    fn from_jwt(e: &jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject => TokenError::SignatureInvalid,
            _ => TokenError::Malformed,
        }
    }
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::SignatureInvalid => write!(f, "Token signature is invalid"),
            TokenError::Malformed => write!(f, "Token is malformed"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Errors that can occur while minting a token.
#[derive(Debug)]
pub enum SigningError {
    /// This codec holds no signing key
    KeyUnavailable,
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for SigningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningError::KeyUnavailable => write!(f, "Signing key unavailable"),
            SigningError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            SigningError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for SigningError {}
