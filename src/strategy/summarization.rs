//! Summarization strategy handles.
//!
//! These describe how a downstream summarizer should consume chunks. They
//! shape model inputs but never call a model.

use serde::{Deserialize, Serialize};

use super::selector::SummarizationKind;
use crate::types::TextChunk;

/// One model-ready input built from one or more chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryInput {
    /// Text handed to the model
    pub content: String,
    /// Ids of the chunks this input was built from
    pub chunk_ids: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_level: Option<u8>,
    pub token_count: usize,
}

impl From<&TextChunk> for SummaryInput {
    fn from(chunk: &TextChunk) -> Self {
        Self {
            content: chunk.content.clone(),
            chunk_ids: vec![chunk.chunk_id],
            section_title: chunk.section_title.clone(),
            section_level: chunk.section_level,
            token_count: chunk.token_count,
        }
    }
}

/// Capability implemented by each summarization mode.
pub trait SummarizationStrategy: Send + Sync {
    fn kind(&self) -> SummarizationKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn description(&self) -> &'static str;

    /// Whether inputs can be sent to the model concurrently.
    fn is_parallelizable(&self) -> bool;

    /// Convert chunks into the inputs this strategy feeds the model, in order.
    fn prepare_inputs(&self, chunks: &[TextChunk]) -> Vec<SummaryInput> {
        chunks.iter().map(SummaryInput::from).collect()
    }
}

/// Everything in a single model call.
pub struct StuffStrategy;

impl SummarizationStrategy for StuffStrategy {
    fn kind(&self) -> SummarizationKind {
        SummarizationKind::Stuff
    }

    fn description(&self) -> &'static str {
        "Single pass - for short documents"
    }

    fn is_parallelizable(&self) -> bool {
        false
    }

    fn prepare_inputs(&self, chunks: &[TextChunk]) -> Vec<SummaryInput> {
        if chunks.is_empty() {
            return vec![];
        }

        let content = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        // Provenance only survives when every chunk shares one section.
        let first = &chunks[0];
        let same_section = chunks
            .iter()
            .all(|c| c.section_title == first.section_title && c.section_level == first.section_level);

        vec![SummaryInput {
            content,
            chunk_ids: chunks.iter().map(|c| c.chunk_id).collect(),
            section_title: if same_section { first.section_title.clone() } else { None },
            section_level: if same_section { first.section_level } else { None },
            token_count: chunks.iter().map(|c| c.token_count).sum(),
        }]
    }
}

/// Summarize each chunk independently, then combine the partial summaries.
pub struct MapReduceStrategy;

impl SummarizationStrategy for MapReduceStrategy {
    fn kind(&self) -> SummarizationKind {
        SummarizationKind::MapReduce
    }

    fn description(&self) -> &'static str {
        "Parallel processing - default for long documents"
    }

    fn is_parallelizable(&self) -> bool {
        true
    }
}

/// Build a summary from the first chunk and refine it with each following one.
pub struct RefineStrategy;

impl SummarizationStrategy for RefineStrategy {
    fn kind(&self) -> SummarizationKind {
        SummarizationKind::Refine
    }

    fn description(&self) -> &'static str {
        "Iterative refinement - premium quality"
    }

    fn is_parallelizable(&self) -> bool {
        false
    }
}
