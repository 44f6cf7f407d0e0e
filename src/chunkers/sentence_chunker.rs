//! Sentence-based chunker that respects sentence boundaries.

use super::base::{split_sentences, Chunker, TokenCounter, SENTENCE_DELIMITERS};
use super::buffer::ChunkBuffer;
use crate::error::Result;
use crate::types::{ChunkConfig, ChunkStrategyTag, ProcessedDocument, TextChunk};

const SEPARATOR: &str = " ";

/// Sentence-based chunker that splits the full text at sentence boundaries.
///
/// Sentences are grouped into chunks that respect the token limit. Unlike
/// the smart chunker, no tail of the previous chunk is carried over.
pub struct SentenceChunker {
    /// Sentence-ending delimiters
    delimiters: Vec<char>,
}

impl SentenceChunker {
    /// Create a new sentence chunker with default delimiters.
    pub fn new() -> Self {
        Self {
            delimiters: SENTENCE_DELIMITERS.to_vec(),
        }
    }

    /// Create a sentence chunker with custom delimiters.
    pub fn with_delimiters(delimiters: Vec<char>) -> Self {
        Self { delimiters }
    }

    fn emit(chunks: &mut Vec<TextChunk>, text: String, counter: &dyn TokenCounter) {
        let token_count = counter.count_tokens(&text);
        chunks.push(TextChunk::new(
            text,
            chunks.len(),
            token_count,
            ChunkStrategyTag::Sentence,
        ));
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for SentenceChunker {
    fn name(&self) -> &'static str {
        "sentence"
    }

    fn description(&self) -> &'static str {
        "Groups sentences of the full text into chunks within the token limit"
    }

    fn chunk(
        &self,
        document: &ProcessedDocument,
        config: &ChunkConfig,
        counter: &dyn TokenCounter,
    ) -> Result<Vec<TextChunk>> {
        let content = &document.full_text;
        if content.is_empty() {
            return Ok(vec![]);
        }

        let mut chunks = Vec::new();
        let mut buffer = ChunkBuffer::new(SEPARATOR, counter.count_tokens(SEPARATOR));

        for sentence in split_sentences(content, &self.delimiters) {
            let sent_tokens = counter.count_tokens(&sentence);

            if !buffer.fits(sent_tokens, config.chunk_size) && !buffer.is_empty() {
                if let Some(text) = buffer.take() {
                    Self::emit(&mut chunks, text, counter);
                }
            }
            buffer.push(sentence, sent_tokens);
        }

        if let Some(text) = buffer.take() {
            Self::emit(&mut chunks, text, counter);
        }

        Ok(chunks)
    }
}
