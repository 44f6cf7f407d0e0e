//! Chunk type definitions.

use serde::{Deserialize, Serialize};

/// Which code path produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategyTag {
    /// A whole section that fit the budget (smart strategy)
    SectionPreserved,
    /// Paragraphs accumulated from an oversized section
    ParagraphBased,
    /// Sentences accumulated from an oversized paragraph
    SentenceSplit,
    /// Fixed token window
    Fixed,
    /// Sentence strategy over the full text
    Sentence,
    /// One chunk per section
    Section,
}

impl ChunkStrategyTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkStrategyTag::SectionPreserved => "section_preserved",
            ChunkStrategyTag::ParagraphBased => "paragraph_based",
            ChunkStrategyTag::SentenceSplit => "sentence_split",
            ChunkStrategyTag::Fixed => "fixed",
            ChunkStrategyTag::Sentence => "sentence",
            ChunkStrategyTag::Section => "section",
        }
    }
}

impl std::fmt::Display for ChunkStrategyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded slice of document text prepared as one summarization input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// The chunk's text
    pub content: String,

    /// Position of this chunk within one chunking call (0-indexed)
    pub chunk_id: usize,

    /// Title of the originating section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,

    /// Level of the originating section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_level: Option<u8>,

    /// Number of tokens in `content`
    pub token_count: usize,

    /// Strategy tag and completeness flag
    pub metadata: ChunkMetadata,
}

impl TextChunk {
    /// Create a chunk with no section provenance.
    pub fn new(content: String, chunk_id: usize, token_count: usize, strategy: ChunkStrategyTag) -> Self {
        Self {
            content,
            chunk_id,
            section_title: None,
            section_level: None,
            token_count,
            metadata: ChunkMetadata::new(strategy),
        }
    }

    /// Attach the originating section's title and level.
    pub fn with_section(mut self, title: &str, level: u8) -> Self {
        self.section_title = Some(title.to_string());
        self.section_level = Some(level);
        self
    }

    /// Mark the chunk as holding a complete section.
    pub fn complete_section(mut self) -> Self {
        self.metadata.is_complete_section = Some(true);
        self
    }

    pub fn strategy(&self) -> ChunkStrategyTag {
        self.metadata.strategy
    }

    /// Get the length of the chunk content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata associated with a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Strategy that produced the chunk
    pub strategy: ChunkStrategyTag,

    /// Set when the chunk holds an entire section verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete_section: Option<bool>,

    /// Additional arbitrary metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl ChunkMetadata {
    pub fn new(strategy: ChunkStrategyTag) -> Self {
        Self {
            strategy,
            is_complete_section: None,
            extra: None,
        }
    }
}
