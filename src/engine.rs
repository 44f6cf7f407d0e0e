//! Chunking engine: one configured entry point over all chunking strategies.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chunkers::{
    Chunker, SectionChunker, SentenceChunker, SmartChunker, TiktokenCounter, TokenChunker,
    TokenCounter,
};
use crate::error::{ChunkingError, Result};
use crate::types::{ChunkConfig, ChunkingConfig, ProcessedDocument, TextChunk};

/// Segmentation algorithm applied to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Section-aware with paragraph and sentence fallback
    #[default]
    Smart,
    /// Fixed token windows over the full text
    Fixed,
    /// Sentence groups over the full text
    Sentence,
    /// One chunk per section
    Section,
}

impl ChunkingStrategy {
    pub const ALL: [ChunkingStrategy; 4] = [
        ChunkingStrategy::Smart,
        ChunkingStrategy::Fixed,
        ChunkingStrategy::Sentence,
        ChunkingStrategy::Section,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Smart => "smart",
            ChunkingStrategy::Fixed => "fixed",
            ChunkingStrategy::Sentence => "sentence",
            ChunkingStrategy::Section => "section",
        }
    }
}

impl FromStr for ChunkingStrategy {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "smart" => Ok(ChunkingStrategy::Smart),
            "fixed" => Ok(ChunkingStrategy::Fixed),
            "sentence" => Ok(ChunkingStrategy::Sentence),
            "section" => Ok(ChunkingStrategy::Section),
            other => Err(ChunkingError::unknown_chunking_strategy(other)),
        }
    }
}

impl std::fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token-aware chunking engine.
///
/// Constructed once with a chunk size, an overlap and a token counter, then
/// reused for any number of documents. It keeps no per-document state.
pub struct ChunkingEngine {
    config: ChunkConfig,
    counter: Arc<dyn TokenCounter>,
    smart_chunker: Arc<SmartChunker>,
    token_chunker: Arc<TokenChunker>,
    sentence_chunker: Arc<SentenceChunker>,
    section_chunker: Arc<SectionChunker>,
}

impl ChunkingEngine {
    /// Create an engine with the given budget, overlap and token counter.
    pub fn new(chunk_size: usize, chunk_overlap: usize, counter: Arc<dyn TokenCounter>) -> Self {
        Self::with_config(
            ChunkConfig::with_size(chunk_size).with_overlap(chunk_overlap),
            counter,
        )
    }

    /// Create an engine from a chunk configuration.
    pub fn with_config(config: ChunkConfig, counter: Arc<dyn TokenCounter>) -> Self {
        if config.chunk_overlap >= config.chunk_size {
            warn!(
                chunk_size = config.chunk_size,
                chunk_overlap = config.chunk_overlap,
                "chunk_overlap is not smaller than chunk_size; the fixed strategy will reject this configuration"
            );
        }

        Self {
            config,
            counter,
            smart_chunker: Arc::new(SmartChunker::new()),
            token_chunker: Arc::new(TokenChunker::new()),
            sentence_chunker: Arc::new(SentenceChunker::new()),
            section_chunker: Arc::new(SectionChunker::new()),
        }
    }

    /// Create an engine from service configuration, loading its tokenizer.
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        let counter = TiktokenCounter::with_encoding(&config.encoding)?;
        Ok(Self::with_config(config.chunk_config(), Arc::new(counter)))
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.config.chunk_overlap
    }

    /// The token counter every chunk is measured with.
    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count_tokens(text)
    }

    /// Get the chunker implementing a strategy.
    pub fn get_chunker(&self, strategy: ChunkingStrategy) -> Arc<dyn Chunker> {
        match strategy {
            ChunkingStrategy::Smart => Arc::clone(&self.smart_chunker) as Arc<dyn Chunker>,
            ChunkingStrategy::Fixed => Arc::clone(&self.token_chunker) as Arc<dyn Chunker>,
            ChunkingStrategy::Sentence => Arc::clone(&self.sentence_chunker) as Arc<dyn Chunker>,
            ChunkingStrategy::Section => Arc::clone(&self.section_chunker) as Arc<dyn Chunker>,
        }
    }

    /// Get a chunker by strategy name.
    pub fn get_chunker_by_name(&self, name: &str) -> Option<Arc<dyn Chunker>> {
        name.parse().ok().map(|strategy| self.get_chunker(strategy))
    }

    /// List all available chunkers.
    pub fn list_chunkers(&self) -> Vec<(&'static str, &'static str)> {
        ChunkingStrategy::ALL
            .iter()
            .map(|strategy| {
                let chunker = self.get_chunker(*strategy);
                (chunker.name(), chunker.description())
            })
            .collect()
    }

    /// Chunk a document with the strategy of the given name.
    ///
    /// Fails with [`ChunkingError::InvalidArgument`] for unknown names.
    pub fn chunk_document(&self, document: &ProcessedDocument, strategy: &str) -> Result<Vec<TextChunk>> {
        let strategy: ChunkingStrategy = strategy.parse()?;
        self.chunk_with(document, strategy)
    }

    /// Chunk a document with a parsed strategy.
    pub fn chunk_with(&self, document: &ProcessedDocument, strategy: ChunkingStrategy) -> Result<Vec<TextChunk>> {
        let chunker = self.get_chunker(strategy);
        let chunks = chunker.chunk(document, &self.config, self.counter.as_ref())?;

        info!(
            filename = %document.filename,
            strategy = %strategy,
            sections = document.sections.len(),
            chunks = chunks.len(),
            total_tokens = Self::total_tokens(&chunks),
            "Chunked document"
        );

        Ok(chunks)
    }

    /// Sum of chunk token counts, overlap included.
    pub fn total_tokens(chunks: &[TextChunk]) -> usize {
        chunks.iter().map(|c| c.token_count).sum()
    }

    /// Suggest a chunk size from the document's length and structure.
    pub fn recommended_chunk_size(&self, document: &ProcessedDocument) -> usize {
        let total_tokens = self.count_tokens(&document.full_text);
        let num_sections = document.sections.len();

        if total_tokens < 5000 {
            500
        } else if total_tokens < 20000 && num_sections > 3 {
            1000
        } else if total_tokens < 50000 {
            1500
        } else {
            2000
        }
    }
}

impl Default for ChunkingEngine {
    fn default() -> Self {
        Self::with_config(ChunkConfig::default(), Arc::new(TiktokenCounter::new()))
    }
}
