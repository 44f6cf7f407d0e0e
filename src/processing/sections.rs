//! Heading detection for plain text and markdown.
//!
//! Produces a [`ProcessedDocument`] from raw text so callers without their own
//! parser can still use the section-aware strategies.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::types::{DocumentSection, ProcessedDocument};

/// Title given to the single section of a document with no headings.
pub const FALLBACK_SECTION_TITLE: &str = "Document Content";

lazy_static! {
    static ref MARKDOWN_HEADING: Regex = Regex::new(r"^(#{1,6})\s+(.+)$").unwrap();
    static ref ALL_CAPS_HEADING: Regex = Regex::new(r"^[A-Z][A-Z\s]{3,}$").unwrap();
    static ref NUMBERED_HEADING: Regex = Regex::new(r"^(\d+\.(?:\d+\.)*)\s+(.+)$").unwrap();
    static ref ROMAN_HEADING: Regex = Regex::new(r"^[IVXLCDM]+\.\s+.+$").unwrap();
}

/// Splits text into titled, leveled sections.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionParser;

impl SectionParser {
    pub fn new() -> Self {
        Self
    }

    /// Match a trimmed line against the heading patterns, in priority order.
    fn detect_heading(&self, line: &str) -> Option<(String, u8)> {
        if let Some(caps) = MARKDOWN_HEADING.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len());
            let title = caps.get(2).map_or("", |m| m.as_str()).trim();
            return Some((title.to_string(), level as u8));
        }

        if ALL_CAPS_HEADING.is_match(line) {
            return Some((line.to_string(), 2));
        }

        if let Some(caps) = NUMBERED_HEADING.captures(line) {
            let components = caps
                .get(1)
                .map_or(1, |m| m.as_str().split('.').filter(|p| !p.is_empty()).count());
            let title = caps.get(2).map_or("", |m| m.as_str()).trim();
            return Some((title.to_string(), components.min(6) as u8));
        }

        if ROMAN_HEADING.is_match(line) {
            return Some((line.to_string(), 2));
        }

        None
    }

    /// Extract sections from text based on headings.
    ///
    /// Text before the first heading is dropped. Lines inside fenced code
    /// blocks are never treated as headings.
    pub fn extract_sections(&self, text: &str) -> Vec<DocumentSection> {
        let mut sections = Vec::new();
        let mut current: Option<(String, u8)> = None;
        let mut body: Vec<&str> = Vec::new();
        let mut in_code_block = false;

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with("```") {
                in_code_block = !in_code_block;
            }

            if !in_code_block && !trimmed.is_empty() {
                if let Some((title, level)) = self.detect_heading(trimmed) {
                    if let Some((prev_title, prev_level)) = current.take() {
                        sections.push(DocumentSection::new(prev_title, body.join("\n").trim(), prev_level));
                    }
                    body.clear();
                    current = Some((title, level));
                    continue;
                }
            }

            body.push(line);
        }

        if let Some((title, level)) = current {
            sections.push(DocumentSection::new(title, body.join("\n").trim(), level));
        }

        if sections.is_empty() {
            sections.push(DocumentSection::new(FALLBACK_SECTION_TITLE, text, 1));
        }

        debug!(sections = sections.len(), "Extracted sections");
        sections
    }
}

impl ProcessedDocument {
    /// Parse raw text into a document with detected sections.
    pub fn from_text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let sections = SectionParser::new().extract_sections(&text);
        ProcessedDocument::new(text, sections).with_filename(filename)
    }
}
