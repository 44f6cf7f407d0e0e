//! Threshold-based choice of summarization strategy.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::summarization::{MapReduceStrategy, RefineStrategy, StuffStrategy, SummarizationStrategy};
use crate::error::{ChunkingError, Result};
use crate::types::TextChunk;
use crate::{REFINE_MAX_TOKENS, STUFF_MAX_TOKENS};

/// Caller's trade-off between speed and summary quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreference {
    Fast,
    #[default]
    Balanced,
    Premium,
}

impl QualityPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreference::Fast => "fast",
            QualityPreference::Balanced => "balanced",
            QualityPreference::Premium => "premium",
        }
    }
}

impl FromStr for QualityPreference {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fast" => Ok(QualityPreference::Fast),
            "balanced" => Ok(QualityPreference::Balanced),
            "premium" => Ok(QualityPreference::Premium),
            other => Err(ChunkingError::InvalidArgument(format!(
                "Unknown quality preference: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for QualityPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downstream summarization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizationKind {
    /// Single pass over all chunks
    Stuff,
    /// Summarize chunks independently, then combine
    MapReduce,
    /// Sequentially refine a running summary
    Refine,
}

impl SummarizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummarizationKind::Stuff => "stuff",
            SummarizationKind::MapReduce => "map_reduce",
            SummarizationKind::Refine => "refine",
        }
    }
}

impl FromStr for SummarizationKind {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stuff" => Ok(SummarizationKind::Stuff),
            "map_reduce" => Ok(SummarizationKind::MapReduce),
            "refine" => Ok(SummarizationKind::Refine),
            other => Err(ChunkingError::unknown_summarization_strategy(other)),
        }
    }
}

impl std::fmt::Display for SummarizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chooses a summarization strategy from document size and quality preference.
pub struct StrategySelector;

impl StrategySelector {
    /// Select a strategy. Rules are checked in order; the first match wins:
    ///
    /// 1. fewer than 4000 tokens: `stuff`
    /// 2. premium and fewer than 50000 tokens: `refine`
    /// 3. everything else: `map_reduce`
    pub fn select_strategy(total_tokens: usize, quality_preference: QualityPreference) -> SummarizationKind {
        let kind = if total_tokens < STUFF_MAX_TOKENS {
            SummarizationKind::Stuff
        } else if quality_preference == QualityPreference::Premium && total_tokens < REFINE_MAX_TOKENS {
            SummarizationKind::Refine
        } else {
            SummarizationKind::MapReduce
        };

        debug!(
            total_tokens,
            quality = %quality_preference,
            strategy = %kind,
            "Selected summarization strategy"
        );

        kind
    }

    /// Select a strategy for already chunked text.
    pub fn select_for_chunks(chunks: &[TextChunk], quality_preference: QualityPreference) -> SummarizationKind {
        let total_tokens = chunks.iter().map(|c| c.token_count).sum();
        Self::select_strategy(total_tokens, quality_preference)
    }

    /// Resolve a strategy name to its handle.
    pub fn get_strategy_instance(name: &str) -> Result<Box<dyn SummarizationStrategy>> {
        let kind: SummarizationKind = name.parse()?;
        Ok(Self::instance_for(kind))
    }

    /// Handle for an already parsed strategy.
    pub fn instance_for(kind: SummarizationKind) -> Box<dyn SummarizationStrategy> {
        match kind {
            SummarizationKind::Stuff => Box::new(StuffStrategy),
            SummarizationKind::MapReduce => Box::new(MapReduceStrategy),
            SummarizationKind::Refine => Box::new(RefineStrategy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use QualityPreference::*;

    fn select(tokens: usize, quality: QualityPreference) -> &'static str {
        StrategySelector::select_strategy(tokens, quality).as_str()
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(select(3999, Balanced), "stuff");
        assert_eq!(select(4000, Premium), "refine");
        assert_eq!(select(49999, Premium), "refine");
        assert_eq!(select(50001, Premium), "map_reduce");
        assert_eq!(select(10000, Balanced), "map_reduce");
        assert_eq!(select(10000, Fast), "map_reduce");
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(select(0, Premium), "stuff");
        assert_eq!(select(3999, Premium), "stuff");
        assert_eq!(select(4000, Fast), "map_reduce");
        assert_eq!(select(50000, Premium), "map_reduce");
        assert_eq!(select(50000, Balanced), "map_reduce");
        assert_eq!(select(usize::MAX, Fast), "map_reduce");
    }

    #[test]
    fn test_every_input_maps_to_known_strategy() {
        for tokens in [0, 1, 3999, 4000, 4001, 20000, 49999, 50000, 50001, 1_000_000] {
            for quality in [Fast, Balanced, Premium] {
                let kind = StrategySelector::select_strategy(tokens, quality);
                assert!(StrategySelector::get_strategy_instance(kind.as_str()).is_ok());
            }
        }
    }

    #[test]
    fn test_get_strategy_instance() {
        let refine = StrategySelector::get_strategy_instance("refine").unwrap();
        assert_eq!(refine.kind(), SummarizationKind::Refine);
        assert!(!refine.is_parallelizable());

        let map_reduce = StrategySelector::get_strategy_instance("map_reduce").unwrap();
        assert!(map_reduce.is_parallelizable());

        let err = StrategySelector::get_strategy_instance("summarize_all").err().unwrap();
        assert_eq!(
            err,
            ChunkingError::InvalidArgument("Unknown strategy: summarize_all".to_string())
        );
    }

    #[test]
    fn test_quality_parsing() {
        assert_eq!("premium".parse::<QualityPreference>().unwrap(), Premium);
        assert!("best".parse::<QualityPreference>().is_err());
        assert_eq!(QualityPreference::default(), Balanced);
        let parsed: QualityPreference = serde_json::from_str("\"fast\"").unwrap();
        assert_eq!(parsed, Fast);
    }
}
