use anyhow::{Context, Result};
use odds_watch::config::Config;
use odds_watch::server::{self, AppState};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("odds_watch=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load saved keys from .env (real env vars take precedence)
    Config::load_env_file();

    let config_path = std::env::var("ODDS_WATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::load_or_default(&config_path)?;

    let bind = config.server.bind.clone();
    let state = AppState::from_env(config)?;

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {}", bind))?;
    tracing::info!(bind = %bind, "odds-watch listening");

    server::serve(listener, state).await
}
