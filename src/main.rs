use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use grocery_api::config::{self, AppConfig};
use grocery_api::database::{DatabaseManager, SqlProductStore};
use grocery_api::AppState;

#[derive(Parser)]
#[command(name = "grocery-api")]
#[command(about = "Grocery catalogue API with bearer-token auth and request throttling")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides GROCERY_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides GROCERY_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "SQLite database URL (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up GROCERY_JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut loaded = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(host) = args.host {
        loaded.server.host = host;
    }
    if let Some(port) = args.port {
        loaded.server.port = port;
    }
    if let Some(url) = args.database_url {
        loaded.database.url = url;
    }
    let config = config::init(loaded)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Grocery API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open product store")?;
    let store = Arc::new(SqlProductStore::new(pool));

    let state = AppState::from_config(config, store).context("invalid rate limit settings")?;
    let app = grocery_api::app(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "Grocery API listening on http://{} (one request per {:?}, burst {})",
        bind_addr,
        config.rate_limit.interval(),
        config.rate_limit.burst
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
