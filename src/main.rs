//! Document Chunker Service - Main Entry Point

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_chunker::api::{self, AppState};
use doc_chunker::batch::{BatchConfig, BatchProcessor};
use doc_chunker::engine::ChunkingEngine;
use doc_chunker::types::ChunkingConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "doc_chunker=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ChunkingConfig::from_env();

    info!("Starting Document Chunker v{}", env!("CARGO_PKG_VERSION"));
    info!(
        chunk_size = config.default_chunk_size,
        chunk_overlap = config.default_chunk_overlap,
        strategy = %config.default_strategy,
        encoding = %config.encoding,
        "Loaded configuration"
    );

    // Unknown default strategy is a startup error
    config.default_strategy.parse::<doc_chunker::ChunkingStrategy>()?;

    let engine = Arc::new(ChunkingEngine::from_config(&config)?);
    let batch = BatchProcessor::new(
        Arc::clone(&engine),
        BatchConfig {
            concurrency: config.batch_concurrency,
            continue_on_error: true,
        },
    );

    let state = Arc::new(AppState { engine, batch, config });
    let app = api::router(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3017);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
