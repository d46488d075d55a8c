//! gnotes-api - HTTP API server for GenAI Notes

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use gnotes_api::telemetry::init_tracing;
use gnotes_api::{build_router, AnalyticsCache, AppConfig, AppState, Backends};
use gnotes_db::{log_pool_metrics, Database, PoolConfig};
use gnotes_inference::{OpenAIBackend, RetryPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _file_guard = init_tracing("gnotes_api=debug,tower_http=debug", "gnotes-api.log");

    let config = AppConfig::from_env()?;

    let db = Database::connect_with_config(&config.database_url, PoolConfig::from_env())
        .await
        .context("failed to connect to database")?;
    db.migrate().await.context("failed to run migrations")?;
    log_pool_metrics(db.pool());

    let backend = Arc::new(OpenAIBackend::new(config.openai.clone())?);
    info!(
        subsystem = "api",
        chat_model = %config.openai.chat_model,
        embed_model = %config.openai.embed_model,
        "OpenAI backend configured"
    );

    let analytics_cache = config
        .analytics_cache_path
        .clone()
        .map(AnalyticsCache::at)
        .unwrap_or_else(AnalyticsCache::disabled);

    let state = AppState::with_options(
        Backends {
            store: db.note_store(),
            usage_log: db.usage_log(),
            completion: backend.clone(),
            embedder: backend,
        },
        config.search,
        RetryPolicy::default(),
        analytics_cache,
    );

    match state.workspace.load().await {
        Ok(count) => info!(subsystem = "api", result_count = count, "Notes loaded"),
        Err(e) => warn!(subsystem = "api", error = %e, "Initial note load failed"),
    }

    let app = build_router(state, config.allowed_origins.clone());

    // Start server
    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
