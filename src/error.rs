//! Error types for chunking and strategy selection.

use thiserror::Error;

/// Errors produced by the chunking engine and strategy selector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    /// An unknown chunking or summarization strategy name was supplied.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The fixed-window strategy cannot advance with this configuration.
    #[error(
        "configuration error: chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
    )]
    Configuration {
        chunk_size: usize,
        chunk_overlap: usize,
    },

    /// The token counter could not turn a token slice back into text.
    #[error("token decode failed for {tokens} tokens: {reason}")]
    Decode { tokens: usize, reason: String },

    /// Re-encoding decoded text did not line up with the requested tokens.
    #[error("encoding round trip failure: expected {expected} tokens, got {actual}")]
    EncodingRoundTrip { expected: usize, actual: usize },
}

impl ChunkingError {
    pub(crate) fn unknown_chunking_strategy(name: &str) -> Self {
        Self::InvalidArgument(format!("Unknown chunking strategy: {}", name))
    }

    pub(crate) fn unknown_summarization_strategy(name: &str) -> Self {
        Self::InvalidArgument(format!("Unknown strategy: {}", name))
    }

    /// True for errors caused by caller input rather than the token counter.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::Configuration { .. })
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ChunkingError>;
