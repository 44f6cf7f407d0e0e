//! Document Chunker Library
//!
//! Token-aware segmentation of sectioned documents for LLM summarization
//! pipelines, plus selection of a downstream summarization strategy.

pub mod api;
pub mod batch;
pub mod chunkers;
pub mod engine;
pub mod error;
pub mod processing;
pub mod strategy;
pub mod types;

pub use batch::{BatchConfig, BatchProcessor, BatchResult};
pub use chunkers::{Chunker, TiktokenCounter, TokenCounter};
pub use engine::{ChunkingEngine, ChunkingStrategy};
pub use error::{ChunkingError, Result};
pub use processing::SectionParser;
pub use strategy::{QualityPreference, StrategySelector, SummarizationKind, SummarizationStrategy};
pub use types::{ChunkConfig, ChunkMetadata, DocumentSection, ProcessedDocument, TextChunk};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunkers::{Chunker, TiktokenCounter, TokenCounter};
    pub use crate::engine::{ChunkingEngine, ChunkingStrategy};
    pub use crate::error::ChunkingError;
    pub use crate::strategy::*;
    pub use crate::types::*;
}

/// Default chunk size in tokens
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default chunk overlap in tokens
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Default tokenizer encoding
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Default number of documents chunked concurrently in a batch
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Documents below this many tokens are summarized in a single pass
pub const STUFF_MAX_TOKENS: usize = 4000;

/// Premium-quality documents below this many tokens use iterative refinement
pub const REFINE_MAX_TOKENS: usize = 50000;
