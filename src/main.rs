use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use courses_api::config;
use courses_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use courses_api::AppState;

#[derive(Debug, Parser)]
#[command(name = "courses-api", about = "REST API for users and their courses")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Keep all data in process memory instead of Postgres
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courses_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting courses API in {:?} mode", config.environment);

    let (store, manager): (Arc<dyn Store>, Option<DatabaseManager>) = if args.in_memory {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        (Arc::new(MemoryStore::new()), None)
    } else {
        let manager = DatabaseManager::connect(args.database_url.as_deref(), &config.database)
            .await
            .context("Connection to database is not successful")?;
        manager.ensure_schema().await.context("failed to prepare schema")?;
        (Arc::new(PgStore::new(manager.pool())), Some(manager))
    };

    let app = courses_api::app(AppState::new(store), config);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Courses API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(manager) = manager {
        manager.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
