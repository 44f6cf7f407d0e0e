//! Configuration types for chunking.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BATCH_CONCURRENCY, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_ENCODING};

/// Global chunking service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Default chunk size in tokens
    pub default_chunk_size: usize,

    /// Default chunk overlap in tokens
    pub default_chunk_overlap: usize,

    /// Chunking strategy used when a request names none
    pub default_strategy: String,

    /// Tokenizer encoding name
    pub encoding: String,

    /// Maximum documents chunked concurrently in a batch
    pub batch_concurrency: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: DEFAULT_CHUNK_SIZE,
            default_chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            default_strategy: "smart".to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl ChunkingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            default_chunk_size: std::env::var("CHUNK_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            default_chunk_overlap: std::env::var("CHUNK_OVERLAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CHUNK_OVERLAP),
            default_strategy: std::env::var("DEFAULT_CHUNK_STRATEGY")
                .unwrap_or_else(|_| "smart".to_string()),
            encoding: std::env::var("TOKENIZER_ENCODING")
                .unwrap_or_else(|_| DEFAULT_ENCODING.to_string()),
            batch_concurrency: std::env::var("BATCH_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_BATCH_CONCURRENCY),
        }
    }

    /// The per-engine chunk configuration derived from these defaults.
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig::with_size(self.default_chunk_size).with_overlap(self.default_chunk_overlap)
    }
}

/// Configuration for one chunking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Target tokens per chunk
    pub chunk_size: usize,

    /// Tokens repeated between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkConfig {
    /// Create a config with the given chunk size.
    pub fn with_size(size: usize) -> Self {
        Self {
            chunk_size: size,
            ..Default::default()
        }
    }

    /// Set the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Distance the fixed window advances per step, if it can advance at all.
    pub fn window_step(&self) -> Option<usize> {
        self.chunk_size
            .checked_sub(self.chunk_overlap)
            .filter(|step| *step > 0)
    }
}
