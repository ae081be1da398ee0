use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use pantry_api::database::pg::PgStore;
use pantry_api::{app, config, AppState};

#[derive(Debug, Parser)]
#[command(name = "pantry-api", about = "Recipe management API server")]
struct Args {
    /// Port to listen on (overrides PANTRY_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Serve from the in-memory store instead of PostgreSQL
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Pantry API in {:?} mode", config.environment);

    let state = if args.memory {
        tracing::warn!("using in-memory store; data will not survive a restart");
        AppState::in_memory()
    } else {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let store = PgStore::connect(&database_url).await?;
        store.ensure_schema().await?;
        AppState::new(Arc::new(store))
    };

    // Allow tests or deployments to override port via flag or env
    let port = args
        .port
        .or_else(|| std::env::var("PANTRY_API_PORT").ok().and_then(|s| s.parse().ok()))
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Pantry API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
