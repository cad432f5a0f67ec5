pub mod api;
pub mod auth;
pub mod cli;
pub mod jwt;

use api::create_api_router;
use auth::{AuthEngine, CookieSettings, SessionCookies};
use axum::Router;
use jwt::{TokenCodec, TokenLifetimes};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub struct ServerConfig {
    /// Base path for the application (e.g., "/app")
    pub base: Option<String>,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Lifetimes of the access and refresh tokens
    pub lifetimes: TokenLifetimes,
    /// Session cookie names and attributes
    pub cookies: CookieSettings,
}

/// Build the process-wide auth engine. Keys are derived once here and
/// shared read-only by every request.
pub fn create_engine(config: &ServerConfig) -> Arc<AuthEngine> {
    let codec = TokenCodec::new(&config.jwt_secret, config.lifetimes);
    Arc::new(AuthEngine::new(SessionCookies::new(
        codec,
        config.cookies.clone(),
    )))
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    app_with_engine(config.base.as_deref(), create_engine(config))
}

/// Create the application router around an existing engine.
pub fn app_with_engine(base: Option<&str>, engine: Arc<AuthEngine>) -> Router {
    let api_path = format!("{}/api", base.unwrap_or("").trim_end_matches('/'));

    Router::new()
        .nest(&api_path, create_api_router(engine))
        .layer(TraceLayer::new_for_http())
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(
    config: ServerConfig,
    listener: TcpListener,
) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
