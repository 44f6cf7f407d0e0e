//! Parsed document types consumed by the chunkers.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\b\w+\b").unwrap();
}

/// A titled, leveled subdivision of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Heading text
    pub title: String,

    /// Section body, excluding its own heading line
    pub content: String,

    /// Heading depth (1-6), 1 is the most significant
    #[serde(deserialize_with = "deserialize_level")]
    pub level: u8,
}

/// Heading depth from the wire, clamped to 1-6 like [`DocumentSection::new`].
fn deserialize_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let level = u64::deserialize(deserializer)?;
    Ok(level.clamp(1, 6) as u8)
}

impl DocumentSection {
    /// Create a new section.
    pub fn new(title: impl Into<String>, content: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            level: level.clamp(1, 6),
        }
    }
}

/// Structured representation of a document after parsing.
///
/// Sections are kept in document order; chunkers rely on that order for
/// chunk id assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Original file name, if known
    #[serde(default)]
    pub filename: String,

    /// The complete extracted text
    pub full_text: String,

    /// Ordered sections
    #[serde(default)]
    pub sections: Vec<DocumentSection>,
}

impl ProcessedDocument {
    /// Create a document from already extracted text and sections.
    pub fn new(full_text: impl Into<String>, sections: Vec<DocumentSection>) -> Self {
        Self {
            filename: String::new(),
            full_text: full_text.into(),
            sections,
        }
    }

    /// Set the file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// An empty document with no text and no sections.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.full_text.is_empty() && self.sections.is_empty()
    }

    /// Number of characters in the full text.
    pub fn total_chars(&self) -> usize {
        self.full_text.chars().count()
    }

    /// Number of words in the full text.
    pub fn total_words(&self) -> usize {
        WORD_RE.find_iter(&self.full_text).count()
    }
}
