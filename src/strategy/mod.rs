//! Summarization strategy selection.

mod selector;
mod summarization;

pub use selector::{QualityPreference, StrategySelector, SummarizationKind};
pub use summarization::{
    MapReduceStrategy, RefineStrategy, StuffStrategy, SummarizationStrategy, SummaryInput,
};
