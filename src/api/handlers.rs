//! HTTP request handlers for the chunking service.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ApiError;
use crate::batch::{BatchProcessor, BatchResult, DocumentChunks};
use crate::engine::{ChunkingEngine, ChunkingStrategy};
use crate::strategy::{QualityPreference, StrategySelector, SummarizationKind};
use crate::types::{ChunkingConfig, ProcessedDocument, TextChunk};

/// Application state shared across handlers.
pub struct AppState {
    pub engine: Arc<ChunkingEngine>,
    pub batch: BatchProcessor,
    pub config: ChunkingConfig,
}

impl AppState {
    /// Resolve a requested strategy name, falling back to the configured default.
    fn strategy(&self, requested: Option<&str>) -> Result<ChunkingStrategy, ApiError> {
        let name = requested.unwrap_or(&self.config.default_strategy);
        Ok(name.parse()?)
    }

    /// Chunk one document off the async runtime.
    async fn chunk(&self, document: ProcessedDocument, strategy: ChunkingStrategy) -> Result<Vec<TextChunk>, ApiError> {
        let engine = Arc::clone(&self.engine);
        let chunks = tokio::task::spawn_blocking(move || engine.chunk_with(&document, strategy)).await??;
        Ok(chunks)
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct StrategyInfo {
    name: String,
    description: String,
}

/// List available chunking strategies.
pub async fn list_strategies(State(state): State<Arc<AppState>>) -> Json<Vec<StrategyInfo>> {
    let strategies = state
        .engine
        .list_chunkers()
        .into_iter()
        .map(|(name, desc)| StrategyInfo {
            name: name.to_string(),
            description: desc.to_string(),
        })
        .collect();

    Json(strategies)
}

#[derive(Debug, Deserialize)]
pub struct ChunkRequest {
    pub document: ProcessedDocument,
    pub strategy: Option<String>,
    #[serde(default)]
    pub quality: QualityPreference,
}

#[derive(Debug, Deserialize)]
pub struct ChunkTextRequest {
    pub filename: Option<String>,
    pub text: String,
    pub strategy: Option<String>,
    #[serde(default)]
    pub quality: QualityPreference,
}

#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub chunks: Vec<TextChunk>,
    pub total_tokens: usize,
    pub summarization_strategy: SummarizationKind,
}

impl ChunkResponse {
    fn new(chunks: Vec<TextChunk>, quality: QualityPreference) -> Self {
        let total_tokens = ChunkingEngine::total_tokens(&chunks);
        Self {
            summarization_strategy: StrategySelector::select_strategy(total_tokens, quality),
            total_tokens,
            chunks,
        }
    }
}

/// Chunk an already sectioned document.
pub async fn chunk_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChunkRequest>,
) -> Result<Json<ChunkResponse>, ApiError> {
    let strategy = state.strategy(request.strategy.as_deref())?;
    info!(filename = %request.document.filename, strategy = %strategy, "Received chunk request");

    let chunks = state.chunk(request.document, strategy).await?;
    Ok(Json(ChunkResponse::new(chunks, request.quality)))
}

/// Detect sections in raw text, then chunk it.
pub async fn chunk_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChunkTextRequest>,
) -> Result<Json<ChunkResponse>, ApiError> {
    let strategy = state.strategy(request.strategy.as_deref())?;
    let document = ProcessedDocument::from_text(request.filename.unwrap_or_default(), request.text);
    info!(
        filename = %document.filename,
        sections = document.sections.len(),
        strategy = %strategy,
        "Received text chunk request"
    );

    let chunks = state.chunk(document, strategy).await?;
    Ok(Json(ChunkResponse::new(chunks, request.quality)))
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub documents: Vec<ProcessedDocument>,
    pub strategy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<DocumentChunks>,
    pub summary: BatchResult,
}

/// Chunk several documents concurrently.
pub async fn chunk_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let strategy = state.strategy(request.strategy.as_deref())?;
    let (results, summary) = state.batch.process_batch(request.documents, strategy).await?;
    Ok(Json(BatchResponse { results, summary }))
}

#[derive(Debug, Deserialize)]
pub struct SelectStrategyRequest {
    pub total_tokens: usize,
    #[serde(default)]
    pub quality: QualityPreference,
}

#[derive(Debug, Serialize)]
pub struct SelectStrategyResponse {
    pub strategy: SummarizationKind,
    pub description: String,
    pub parallelizable: bool,
}

/// Pick a summarization strategy for a token total.
pub async fn select_strategy(Json(request): Json<SelectStrategyRequest>) -> Json<SelectStrategyResponse> {
    let kind = StrategySelector::select_strategy(request.total_tokens, request.quality);
    let handle = StrategySelector::instance_for(kind);

    Json(SelectStrategyResponse {
        strategy: kind,
        description: handle.description().to_string(),
        parallelizable: handle.is_parallelizable(),
    })
}
