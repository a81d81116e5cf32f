use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cook_taste_api::app::{router, AppState};
use cook_taste_api::auth::TokenService;
use cook_taste_api::config::AppConfig;
use cook_taste_api::database::{DatabaseManager, DocumentStore, MemoryStore, PgDocumentStore};

#[derive(Debug, Parser)]
#[command(name = "cook-taste-api", about = "Recipe and review API server")]
struct Args {
    #[arg(long, help = "Listen port (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Keep data in memory instead of Postgres")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_filter))
        .init();
    tracing::info!("Starting cook & taste API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = if args.memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let pool = DatabaseManager::connect(&config)
            .await
            .context("failed to open document store")?;
        Arc::new(PgDocumentStore::new(pool))
    };

    let secret = config.secret_key()?;
    let tokens = TokenService::new(&secret, chrono::Duration::seconds(config.security.token_ttl_secs));
    let app = router(AppState::new(store, tokens));

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Cook and taste server is running on port {}", port);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
