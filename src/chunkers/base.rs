//! Base traits and text helpers shared by all chunkers.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ChunkingError, Result};
use crate::types::{ChunkConfig, ProcessedDocument, TextChunk};

/// Sentence-ending delimiters.
pub const SENTENCE_DELIMITERS: [char; 3] = ['.', '!', '?'];

/// Attempts at widening an overlap tail to a character boundary.
const MAX_ALIGN_TOKENS: usize = 4;

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// The core trait that all chunkers must implement.
///
/// A chunker takes a parsed document and splits it into chunks suitable as
/// summarization inputs. Chunkers hold no per-document state, so one
/// instance can serve concurrent callers.
pub trait Chunker: Send + Sync {
    /// Get the name of this chunker.
    fn name(&self) -> &'static str;

    /// Chunk the given document.
    ///
    /// # Arguments
    /// * `document` - The parsed document to chunk
    /// * `config` - Token budget and overlap
    /// * `counter` - Token counter used for every budget decision
    ///
    /// # Returns
    /// Chunks in document order with ids starting at 0.
    fn chunk(
        &self,
        document: &ProcessedDocument,
        config: &ChunkConfig,
        counter: &dyn TokenCounter,
    ) -> Result<Vec<TextChunk>>;

    /// Get the description of this chunker.
    fn description(&self) -> &'static str {
        "A text chunker"
    }
}

/// Token counter trait for counting tokens in text.
///
/// Implementations must be deterministic, `count_tokens(text)` must equal
/// `encode(text).len()`, and `decode(encode(text))` must reproduce `text`.
pub trait TokenCounter: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Encode text into token IDs.
    fn encode(&self, text: &str) -> Vec<usize>;

    /// Decode token IDs back to text.
    fn decode(&self, tokens: &[usize]) -> Result<String>;
}

/// Default token counter using tiktoken (cl100k_base encoding).
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
    encoding: &'static str,
}

impl TiktokenCounter {
    /// Create a new token counter with the cl100k_base encoding (GPT-4/ChatGPT).
    pub fn new() -> Self {
        // The BPE ranks are compiled into tiktoken-rs; loading cannot fail at runtime.
        let bpe = tiktoken_rs::cl100k_base().expect("Failed to load cl100k_base encoding");
        Self {
            bpe,
            encoding: "cl100k_base",
        }
    }

    /// Create a token counter with a specific encoding.
    pub fn with_encoding(encoding_name: &str) -> Result<Self> {
        let (bpe, encoding) = match encoding_name {
            "cl100k_base" => (tiktoken_rs::cl100k_base(), "cl100k_base"),
            "p50k_base" => (tiktoken_rs::p50k_base(), "p50k_base"),
            "p50k_edit" => (tiktoken_rs::p50k_edit(), "p50k_edit"),
            "r50k_base" => (tiktoken_rs::r50k_base(), "r50k_base"),
            other => {
                return Err(ChunkingError::InvalidArgument(format!(
                    "Unknown tokenizer encoding: {}",
                    other
                )))
            }
        };
        let bpe = bpe.map_err(|e| {
            ChunkingError::InvalidArgument(format!("Failed to load {} encoding: {}", encoding, e))
        })?;
        Ok(Self { bpe, encoding })
    }

    /// Name of the loaded encoding.
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }
}

impl Default for TiktokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[usize]) -> Result<String> {
        self.bpe
            .decode(tokens.to_vec())
            .map_err(|e| ChunkingError::Decode {
                tokens: tokens.len(),
                reason: e.to_string(),
            })
    }
}

/// Helper function to count tokens using the default counter.
pub fn count_tokens(text: &str) -> usize {
    lazy_static! {
        static ref COUNTER: TiktokenCounter = TiktokenCounter::new();
    }
    COUNTER.count_tokens(text)
}

/// Take the last `overlap` tokens of `text` as text.
///
/// Returns `text` unchanged when it is no longer than the overlap. A tail that
/// starts inside a multi-byte character is widened to the character boundary.
/// The decoded tail must be a suffix of `text`.
pub fn overlap_tail(counter: &dyn TokenCounter, text: &str, overlap: usize) -> Result<String> {
    let tokens = counter.encode(text);
    if tokens.len() <= overlap {
        return Ok(text.to_string());
    }

    let mut start = tokens.len() - overlap;
    let mut last_error = None;

    for _ in 0..MAX_ALIGN_TOKENS {
        match counter.decode(&tokens[start..]) {
            Ok(tail) => {
                if tail.is_empty() || !text.ends_with(&tail) {
                    return Err(ChunkingError::EncodingRoundTrip {
                        expected: tokens.len() - start,
                        actual: counter.count_tokens(&tail),
                    });
                }
                return Ok(tail);
            }
            Err(e) => {
                last_error = Some(e);
                if start == 0 {
                    break;
                }
                start -= 1;
            }
        }
    }

    Err(last_error.unwrap_or(ChunkingError::EncodingRoundTrip {
        expected: overlap,
        actual: 0,
    }))
}

/// Split text into paragraphs on blank lines, trimming each and dropping empties.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Split text at sentence boundaries.
///
/// A sentence ends at a delimiter followed by whitespace; the trailing
/// remainder is kept as a final sentence.
pub fn split_sentences(text: &str, delimiters: &[char]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if delimiters.contains(&c) && chars.peek().map_or(false, |next| next.is_whitespace()) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
            while chars.peek().map_or(false, |next| next.is_whitespace()) {
                chars.next();
            }
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_count_matches_encode() {
        let counter = TiktokenCounter::new();
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(counter.count_tokens(text), counter.encode(text).len());
        assert_eq!(counter.count_tokens(text), counter.count_tokens(text));
        assert_eq!(count_tokens(text), counter.count_tokens(text));
    }

    #[test]
    fn test_round_trip() {
        let counter = TiktokenCounter::new();
        let text = "Résumé: naïve café, 東京, emoji 🚀 and plain words.";
        let tokens = counter.encode(text);
        assert_eq!(counter.decode(&tokens).unwrap(), text);
    }

    #[test]
    fn test_unknown_encoding() {
        let err = TiktokenCounter::with_encoding("nope").err().unwrap();
        assert!(matches!(err, ChunkingError::InvalidArgument(_)));
        assert_eq!(TiktokenCounter::with_encoding("p50k_base").unwrap().encoding(), "p50k_base");
    }

    #[test]
    fn test_overlap_tail_is_suffix() {
        let counter = TiktokenCounter::new();
        let text = "one two three four five six seven eight nine ten";
        let tail = overlap_tail(&counter, text, 3).unwrap();
        assert!(text.ends_with(&tail));
        assert_eq!(counter.count_tokens(&tail), 3);
        assert_eq!(tail, " eight nine ten");
    }

    #[test]
    fn test_overlap_tail_short_text() {
        let counter = TiktokenCounter::new();
        assert_eq!(overlap_tail(&counter, "short", 10).unwrap(), "short");
    }

    #[test]
    fn test_overlap_tail_multibyte() {
        let counter = TiktokenCounter::new();
        let text = "数据处理和文本分块是摘要流程的重要组成部分";
        for overlap in 1..8 {
            let tail = overlap_tail(&counter, text, overlap).unwrap();
            assert!(text.ends_with(&tail));
        }
    }

    #[test]
    fn test_split_paragraphs() {
        let text = "  First para\nstill first.\n\n\n Second para. \n   \nThird.\n\n";
        assert_eq!(
            split_paragraphs(text),
            vec!["First para\nstill first.", "Second para.", "Third."]
        );
        assert!(split_paragraphs("   \n\n  ").is_empty());
    }

    #[test]
    fn test_split_sentences() {
        let text = "This is the first sentence. Is this the second?  Yes!\nA trailing fragment";
        assert_eq!(
            split_sentences(text, &SENTENCE_DELIMITERS),
            vec![
                "This is the first sentence.",
                "Is this the second?",
                "Yes!",
                "A trailing fragment"
            ]
        );
    }

    #[test]
    fn test_split_sentences_ignores_inline_dots() {
        let text = "Version 1.2 shipped. See e.g.the notes.";
        assert_eq!(
            split_sentences(text, &SENTENCE_DELIMITERS),
            vec!["Version 1.2 shipped.", "See e.g.the notes."]
        );
    }
}
