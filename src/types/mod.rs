//! Core types for the chunking engine.

mod chunk;
mod config;
mod document;

pub use chunk::{ChunkMetadata, ChunkStrategyTag, TextChunk};
pub use config::{ChunkConfig, ChunkingConfig};
pub use document::{DocumentSection, ProcessedDocument};
