mod config;
mod routes;
mod state;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum ProxyError {
    #[error("config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http client build failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ProxyError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ProxyConfig::from_env()?;
    let port = config.port;
    tracing::info!(backend = %config.backend_url, secure_cookie = config.cookie_secure, "login proxy configured");

    let app = routes::app(state::AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "newsdesk login proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
