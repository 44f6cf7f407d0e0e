//! Lightweight parsing of raw text into processed documents.

mod sections;

pub use sections::{SectionParser, FALLBACK_SECTION_TITLE};
