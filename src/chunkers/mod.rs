//! Chunking strategies for parsed documents.

mod base;
mod buffer;
mod section_chunker;
mod sentence_chunker;
mod smart_chunker;
mod token_chunker;

pub use base::{
    count_tokens, overlap_tail, split_paragraphs, split_sentences, Chunker, TiktokenCounter,
    TokenCounter, SENTENCE_DELIMITERS,
};
pub use section_chunker::SectionChunker;
pub use sentence_chunker::SentenceChunker;
pub use smart_chunker::SmartChunker;
pub use token_chunker::TokenChunker;
