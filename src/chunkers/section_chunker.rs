//! One chunk per document section.

use super::base::{Chunker, TokenCounter};
use crate::error::Result;
use crate::types::{ChunkConfig, ChunkStrategyTag, ProcessedDocument, TextChunk};

/// Emits every non-blank section verbatim, whatever its size.
pub struct SectionChunker;

impl SectionChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SectionChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for SectionChunker {
    fn name(&self) -> &'static str {
        "section"
    }

    fn description(&self) -> &'static str {
        "One chunk per document section, regardless of size"
    }

    fn chunk(
        &self,
        document: &ProcessedDocument,
        _config: &ChunkConfig,
        counter: &dyn TokenCounter,
    ) -> Result<Vec<TextChunk>> {
        let chunks = document
            .sections
            .iter()
            .filter(|section| !section.content.trim().is_empty())
            .enumerate()
            .map(|(chunk_id, section)| {
                TextChunk::new(
                    section.content.clone(),
                    chunk_id,
                    counter.count_tokens(&section.content),
                    ChunkStrategyTag::Section,
                )
                .with_section(&section.title, section.level)
                .complete_section()
            })
            .collect();

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunkers::TiktokenCounter;
    use crate::types::DocumentSection;

    #[test]
    fn test_one_chunk_per_section_even_when_oversized() {
        let chunker = SectionChunker::new();
        let counter = TiktokenCounter::new();
        let big = "Plenty of words in this section. ".repeat(40);
        let document = ProcessedDocument::new(
            "",
            vec![
                DocumentSection::new("Intro", "Short.", 1),
                DocumentSection::new("Body", big.clone(), 2),
            ],
        );

        let chunks = chunker
            .chunk(&document, &ChunkConfig::with_size(10), &counter)
            .unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].chunk_id, 1);
        assert_eq!(chunks[1].content, big);
        assert!(chunks[1].token_count > 10);
        assert_eq!(chunks[1].section_title.as_deref(), Some("Body"));
        assert_eq!(chunks[1].strategy(), ChunkStrategyTag::Section);
        assert_eq!(chunks[1].metadata.is_complete_section, Some(true));
    }

    #[test]
    fn test_blank_middle_section_keeps_ids_dense() {
        let chunker = SectionChunker::new();
        let counter = TiktokenCounter::new();
        let document = ProcessedDocument::new(
            "",
            vec![
                DocumentSection::new("First", "One.", 1),
                DocumentSection::new("Blank", " \n\t ", 1),
                DocumentSection::new("Third", "Three.", 1),
            ],
        );

        let chunks = chunker
            .chunk(&document, &ChunkConfig::default(), &counter)
            .unwrap();

        let summary: Vec<(usize, &str)> = chunks
            .iter()
            .map(|c| (c.chunk_id, c.section_title.as_deref().unwrap()))
            .collect();
        assert_eq!(summary, vec![(0, "First"), (1, "Third")]);
    }

    #[test]
    fn test_no_sections() {
        let chunker = SectionChunker::new();
        let counter = TiktokenCounter::new();
        let chunks = chunker
            .chunk(&ProcessedDocument::empty(), &ChunkConfig::default(), &counter)
            .unwrap();
        assert!(chunks.is_empty());
    }
}
