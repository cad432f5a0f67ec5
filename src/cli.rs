//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::auth::{ACCESS_COOKIE_NAME, CookieSettings, REFRESH_COOKIE_NAME};
use crate::jwt::{ACCESS_TOKEN_DURATION_SECS, REFRESH_TOKEN_DURATION_SECS, TokenLifetimes};
use clap::Parser;
use tracing::error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tokenpair",
    about = "Stateless cookie session authentication with silent token rotation"
)]
pub struct Args {
    /// Base path prefix. The API is served at {base}/api
    #[arg(short, long, value_parser = validate_base_path)]
    pub base: Option<String>,

    /// Port to listen on
    #[arg(short, long, default_value = "7291")]
    pub port: u16,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Name of the access token cookie
    #[arg(
        long,
        env = "ACCESS_COOKIE_NAME",
        default_value = ACCESS_COOKIE_NAME,
        value_parser = validate_cookie_name
    )]
    pub access_cookie: String,

    /// Name of the refresh token cookie
    #[arg(
        long,
        env = "REFRESH_COOKIE_NAME",
        default_value = REFRESH_COOKIE_NAME,
        value_parser = validate_cookie_name
    )]
    pub refresh_cookie: String,

    /// Access token lifetime in seconds
    #[arg(long, default_value_t = ACCESS_TOKEN_DURATION_SECS)]
    pub access_ttl: u64,

    /// Refresh token lifetime in seconds
    #[arg(long, default_value_t = REFRESH_TOKEN_DURATION_SECS)]
    pub refresh_ttl: u64,

    /// Omit the Secure flag on cookies (local HTTP development only)
    #[arg(long)]
    pub insecure_cookies: bool,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_base_path(s: &str) -> Result<String, String> {
    // "/" is the root, same as no base
    if s.is_empty() || s == "/" {
        return Ok(String::new());
    }

    if !s.starts_with('/') {
        return Err(format!("Base path must start with '/': {}", s));
    }

    if s.len() > 1 && s.ends_with('/') {
        return Err(format!("Base path must not end with '/': {}", s));
    }

    if s.chars().any(|c| !c.is_ascii() || c.is_whitespace()) {
        return Err(format!("Base path contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

fn validate_cookie_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("Cookie name cannot be empty".to_string());
    }

    // RFC 6265 token characters
    let separators = "()<>@,;:\\\"/[]?={} \t";
    if s
        .chars()
        .any(|c| !c.is_ascii_graphic() || separators.contains(c))
    {
        return Err(format!("Cookie name contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    validate_jwt_secret(secret)
}

fn validate_jwt_secret(secret: String) -> Option<String> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Check that the token lifetimes make sense together.
/// Returns None and logs an error if validation fails.
pub fn validate_lifetimes(access_ttl: u64, refresh_ttl: u64) -> Option<TokenLifetimes> {
    if access_ttl == 0 || refresh_ttl == 0 {
        error!("Token lifetimes must be greater than zero");
        return None;
    }

    if access_ttl >= refresh_ttl {
        error!(
            access_ttl,
            refresh_ttl, "Access token lifetime must be shorter than the refresh token lifetime"
        );
        return None;
    }

    Some(TokenLifetimes {
        access: access_ttl,
        refresh: refresh_ttl,
    })
}

/// Build ServerConfig from validated arguments.
pub fn build_config(args: Args, jwt_secret: String, lifetimes: TokenLifetimes) -> ServerConfig {
    ServerConfig {
        base: args.base,
        jwt_secret: jwt_secret.into_bytes(),
        lifetimes,
        cookies: CookieSettings {
            access_name: args.access_cookie,
            refresh_name: args.refresh_cookie,
            secure: !args.insecure_cookies,
            path: "/".to_string(),
        },
    }
}
