//! Section-aware chunker with paragraph and sentence fallback.

use tracing::debug;

use super::base::{overlap_tail, split_paragraphs, split_sentences, Chunker, TokenCounter, SENTENCE_DELIMITERS};
use super::buffer::ChunkBuffer;
use crate::error::Result;
use crate::types::{ChunkConfig, ChunkStrategyTag, DocumentSection, ProcessedDocument, TextChunk};

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

/// Structure-aware chunker.
///
/// Sections that fit the budget become one chunk each. Oversized sections
/// are split by paragraphs, and paragraphs that are still too large are
/// split by sentences. Every chunk started after a flush opens with the last
/// `chunk_overlap` tokens of the chunk before it.
pub struct SmartChunker {
    delimiters: Vec<char>,
}

/// Per-call state for splitting one section.
struct SectionSplit<'a> {
    section: &'a DocumentSection,
    config: &'a ChunkConfig,
    counter: &'a dyn TokenCounter,
    /// Index in the output of this section's first chunk
    first: usize,
}

impl SmartChunker {
    /// Create a new smart chunker.
    pub fn new() -> Self {
        Self {
            delimiters: SENTENCE_DELIMITERS.to_vec(),
        }
    }

    /// Split an oversized section into paragraph and sentence chunks.
    fn split_long_section(&self, split: &SectionSplit<'_>, chunks: &mut Vec<TextChunk>) -> Result<()> {
        let chunk_size = split.config.chunk_size;
        let mut buffer = ChunkBuffer::new(
            PARAGRAPH_SEPARATOR,
            split.counter.count_tokens(PARAGRAPH_SEPARATOR),
        );

        for para in split_paragraphs(&split.section.content) {
            let para_tokens = split.counter.count_tokens(&para);

            if para_tokens > chunk_size {
                if let Some(text) = buffer.take() {
                    split.emit(chunks, text, ChunkStrategyTag::ParagraphBased);
                }
                self.split_large_paragraph(split, &para, chunks)?;
            } else if !buffer.fits(para_tokens, chunk_size) {
                if let Some(text) = buffer.take() {
                    split.emit(chunks, text, ChunkStrategyTag::ParagraphBased);
                }
                split.seed_overlap(&mut buffer, chunks)?;
                buffer.push(para, para_tokens);
            } else {
                buffer.push(para, para_tokens);
            }
        }

        if let Some(text) = buffer.take() {
            split.emit(chunks, text, ChunkStrategyTag::ParagraphBased);
        }

        Ok(())
    }

    /// Split a paragraph that alone exceeds the budget by sentences.
    fn split_large_paragraph(
        &self,
        split: &SectionSplit<'_>,
        paragraph: &str,
        chunks: &mut Vec<TextChunk>,
    ) -> Result<()> {
        let chunk_size = split.config.chunk_size;
        let mut buffer = ChunkBuffer::new(
            SENTENCE_SEPARATOR,
            split.counter.count_tokens(SENTENCE_SEPARATOR),
        );

        for sentence in split_sentences(paragraph, &self.delimiters) {
            let sent_tokens = split.counter.count_tokens(&sentence);

            if !buffer.fits(sent_tokens, chunk_size) && !buffer.is_empty() {
                if let Some(text) = buffer.take() {
                    split.emit(chunks, text, ChunkStrategyTag::SentenceSplit);
                }
                split.seed_overlap(&mut buffer, chunks)?;
            }
            buffer.push(sentence, sent_tokens);
        }

        if let Some(text) = buffer.take() {
            split.emit(chunks, text, ChunkStrategyTag::SentenceSplit);
        }

        Ok(())
    }
}

impl SectionSplit<'_> {
    fn emit(&self, chunks: &mut Vec<TextChunk>, text: String, strategy: ChunkStrategyTag) {
        let token_count = self.counter.count_tokens(&text);
        debug!(
            section = %self.section.title,
            chunk_id = chunks.len(),
            token_count,
            strategy = %strategy,
            "Flushing chunk"
        );
        chunks.push(
            TextChunk::new(text, chunks.len(), token_count, strategy)
                .with_section(&self.section.title, self.section.level),
        );
    }

    /// Open a fresh buffer with the tail of this section's latest chunk.
    fn seed_overlap(&self, buffer: &mut ChunkBuffer, chunks: &[TextChunk]) -> Result<()> {
        let overlap = self.config.chunk_overlap;
        if overlap == 0 || chunks.len() <= self.first {
            return Ok(());
        }
        if let Some(previous) = chunks.last() {
            let tail = overlap_tail(self.counter, &previous.content, overlap)?;
            let tail_tokens = self.counter.count_tokens(&tail);
            buffer.push(tail, tail_tokens);
        }
        Ok(())
    }
}

impl Default for SmartChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for SmartChunker {
    fn name(&self) -> &'static str {
        "smart"
    }

    fn description(&self) -> &'static str {
        "Keeps sections whole when they fit, otherwise splits by paragraphs then sentences with overlap"
    }

    fn chunk(
        &self,
        document: &ProcessedDocument,
        config: &ChunkConfig,
        counter: &dyn TokenCounter,
    ) -> Result<Vec<TextChunk>> {
        let mut chunks = Vec::new();

        for section in &document.sections {
            if section.content.trim().is_empty() {
                debug!(section = %section.title, "Skipping empty section");
                continue;
            }

            let section_tokens = counter.count_tokens(&section.content);

            if section_tokens <= config.chunk_size {
                chunks.push(
                    TextChunk::new(
                        section.content.clone(),
                        chunks.len(),
                        section_tokens,
                        ChunkStrategyTag::SectionPreserved,
                    )
                    .with_section(&section.title, section.level)
                    .complete_section(),
                );
                continue;
            }

            debug!(
                section = %section.title,
                section_tokens,
                chunk_size = config.chunk_size,
                "Splitting oversized section"
            );

            let split = SectionSplit {
                section,
                config,
                counter,
                first: chunks.len(),
            };
            self.split_long_section(&split, &mut chunks)?;
        }

        Ok(chunks)
    }
}
