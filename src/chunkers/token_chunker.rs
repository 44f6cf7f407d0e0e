//! Token-based chunker for fixed-size token windows.

use tracing::debug;

use super::base::{Chunker, TokenCounter};
use crate::error::{ChunkingError, Result};
use crate::types::{ChunkConfig, ChunkStrategyTag, ProcessedDocument, TextChunk};

/// Tokens a window edge may move to land on a character boundary.
const MAX_WINDOW_ALIGN: usize = 3;

/// Simple token-based chunker that slides a fixed-size window over the text.
///
/// This chunker doesn't consider document structure. It's fast and
/// predictable, useful for unstructured content.
pub struct TokenChunker;

impl TokenChunker {
    /// Create a new token chunker.
    pub fn new() -> Self {
        Self
    }

    /// Decode the largest window inside `start..end` whose edges fall on
    /// character boundaries and whose text fits `chunk_size` tokens.
    ///
    /// Returns the aligned `(lo, hi)` token range with its text. Only when a
    /// single character spans more tokens than the window holds is the end
    /// moved past `end`.
    fn align_window(
        counter: &dyn TokenCounter,
        tokens: &[usize],
        start: usize,
        end: usize,
        chunk_size: usize,
    ) -> Result<(usize, usize, String)> {
        let mut last_error = None;
        let lo_max = (start + MAX_WINDOW_ALIGN).min(end - 1);

        for lo in start..=lo_max {
            let hi_min = end.saturating_sub(MAX_WINDOW_ALIGN).max(lo + 1);
            for hi in (hi_min..=end).rev() {
                match counter.decode(&tokens[lo..hi]) {
                    Ok(text) => return Ok(Self::shrink_to_budget(counter, tokens, lo, hi, text, chunk_size)),
                    Err(e) => last_error = Some(e),
                }
            }
        }

        // One character is wider than the whole window
        let hi_max = (end + MAX_WINDOW_ALIGN).min(tokens.len());
        for lo in start..=lo_max {
            for hi in end + 1..=hi_max {
                if let Ok(text) = counter.decode(&tokens[lo..hi]) {
                    debug!(lo, hi, chunk_size, "Window widened past budget to fit one character");
                    return Ok((lo, hi, text));
                }
            }
        }

        Err(last_error.unwrap_or(ChunkingError::EncodingRoundTrip {
            expected: end - start,
            actual: 0,
        }))
    }

    /// Pull the window end back until the decoded text recounts within budget.
    fn shrink_to_budget(
        counter: &dyn TokenCounter,
        tokens: &[usize],
        lo: usize,
        mut hi: usize,
        mut text: String,
        chunk_size: usize,
    ) -> (usize, usize, String) {
        let mut candidate = hi;
        while counter.count_tokens(&text) > chunk_size && candidate > lo + 1 {
            candidate -= 1;
            if let Ok(shorter) = counter.decode(&tokens[lo..candidate]) {
                hi = candidate;
                text = shorter;
            }
        }
        (lo, hi, text)
    }
}

impl Default for TokenChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for TokenChunker {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn description(&self) -> &'static str {
        "Splits the full text into fixed-size token windows with optional overlap"
    }

    fn chunk(
        &self,
        document: &ProcessedDocument,
        config: &ChunkConfig,
        counter: &dyn TokenCounter,
    ) -> Result<Vec<TextChunk>> {
        let step = config.window_step().ok_or(ChunkingError::Configuration {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })?;

        let content = &document.full_text;
        if content.is_empty() {
            return Ok(vec![]);
        }

        let tokens = counter.encode(content);
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        let mut chunks = Vec::new();
        let mut start_token = 0;

        while start_token < tokens.len() {
            let end_token = (start_token + config.chunk_size).min(tokens.len());
            let (lo, hi, chunk_text) =
                Self::align_window(counter, &tokens, start_token, end_token, config.chunk_size)?;
            let token_count = counter.count_tokens(&chunk_text);

            chunks.push(TextChunk::new(
                chunk_text,
                chunks.len(),
                token_count,
                ChunkStrategyTag::Fixed,
            ));

            // Stop once the window has covered the end of the text
            if hi >= tokens.len() {
                break;
            }

            // Next window opens `chunk_overlap` tokens before the aligned end,
            // and must start past this one
            let next = hi.saturating_sub(config.chunk_overlap);
            start_token = if next > lo { next } else { hi };
        }

        debug!(
            total_tokens = tokens.len(),
            chunks = chunks.len(),
            step,
            "Fixed-window chunking complete"
        );

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunkers::TiktokenCounter;

    fn text_doc(content: &str) -> ProcessedDocument {
        ProcessedDocument::new(content, vec![])
    }

    #[test]
    fn test_empty_content() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        let chunks = chunker
            .chunk(&text_doc(""), &ChunkConfig::default(), &counter)
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_content() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        let config = ChunkConfig::with_size(100).with_overlap(0);
        let chunks = chunker.chunk(&text_doc("Hello, world!"), &config, &counter).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Hello, world!");
        assert_eq!(chunks[0].strategy(), ChunkStrategyTag::Fixed);
        assert!(chunks[0].section_title.is_none());
    }

    #[test]
    fn test_chunk_overlap() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        let content = "This is a test sentence. ".repeat(50);
        let config = ChunkConfig::with_size(50).with_overlap(10);
        let chunks = chunker.chunk(&text_doc(&content), &config, &counter).unwrap();

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i);
            assert_eq!(chunk.token_count, counter.count_tokens(&chunk.content));
        }

        // The window advances by 40 tokens, so the last 10 tokens of one
        // window open the next.
        let tokens = counter.encode(&content);
        let expected_second = counter.decode(&tokens[40..90]).unwrap();
        assert_eq!(chunks[1].content, expected_second);
    }

    #[test]
    fn test_no_overlap_covers_text_exactly() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        let content = "the cat sat on the mat. ".repeat(30);
        let config = ChunkConfig::with_size(25).with_overlap(0);
        let chunks = chunker.chunk(&text_doc(&content), &config, &counter).unwrap();

        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, content);
        for chunk in &chunks {
            assert!(chunk.token_count <= 25);
        }
    }

    #[test]
    fn test_overlap_not_smaller_than_size_is_rejected() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        for overlap in [100, 150] {
            let config = ChunkConfig::with_size(100).with_overlap(overlap);
            let err = chunker
                .chunk(&text_doc("Some text that would loop."), &config, &counter)
                .unwrap_err();
            assert_eq!(
                err,
                ChunkingError::Configuration {
                    chunk_size: 100,
                    chunk_overlap: overlap
                }
            );
        }
    }

    fn mixed_script_text() -> String {
        "数据处理和文本分块是摘要流程的重要组成部分。🚀 Crème brûlée, naïve café. ".repeat(20)
    }

    #[test]
    fn test_multibyte_windows_partition_text() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        let content = mixed_script_text();

        for size in [7, 16] {
            let config = ChunkConfig::with_size(size).with_overlap(0);
            let chunks = chunker.chunk(&text_doc(&content), &config, &counter).unwrap();

            assert!(chunks.len() > 1);
            for chunk in &chunks {
                assert!(!chunk.content.is_empty());
                assert!(
                    chunk.token_count <= size,
                    "chunk {} has {} tokens for size {}",
                    chunk.chunk_id,
                    chunk.token_count,
                    size
                );
            }

            let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
            assert_eq!(rebuilt, content);
        }
    }

    #[test]
    fn test_multibyte_windows_with_overlap_stay_in_budget() {
        let chunker = TokenChunker::new();
        let counter = TiktokenCounter::new();
        let content = mixed_script_text();
        let config = ChunkConfig::with_size(12).with_overlap(3);

        let chunks = chunker.chunk(&text_doc(&content), &config, &counter).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.token_count <= 12);
            assert!(content.contains(&chunk.content));
        }
        assert!(content.starts_with(&chunks[0].content));
        assert!(content.ends_with(&chunks.last().unwrap().content));
    }
}
