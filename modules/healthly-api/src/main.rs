use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use healthly_api::store::PgStore;
use healthly_api::{build_router, AppState, Upstreams};
use healthly_common::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    let store = PgStore::new(pool);
    store.migrate().await?;
    info!("Database migrations applied");

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let upstreams = Upstreams::live(&config)?;
    if upstreams.historical_index.is_some() {
        info!("Historical documents served from the search index");
    }
    if config.fda_api_key.is_none() {
        info!("FDA_API_KEY not set; openFDA routes will fail");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, upstreams, Arc::new(store)));
    let app = build_router(state);

    info!("Healthly API starting on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
