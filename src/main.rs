mod config;
mod data;
mod filter;
mod routes;
mod state;
mod view;

use config::{ConfigError, DashboardConfig};
use data::DataContext;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = DashboardConfig::from_env().inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;

    // Load both datasets once; failures degrade to an empty dashboard.
    let data = DataContext::load(&config.data);

    let port = config.port;
    let state = state::AppState::new(data, config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|source| StartupError::Bind { port, source })?;

    tracing::info!(%port, "sentiment dashboard listening");
    axum::serve(listener, app).await.map_err(StartupError::Serve)
}
