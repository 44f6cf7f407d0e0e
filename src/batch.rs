//! Batch processing utilities for chunking many documents.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::engine::{ChunkingEngine, ChunkingStrategy};
use crate::types::{ProcessedDocument, TextChunk};
use crate::DEFAULT_BATCH_CONCURRENCY;

/// Configuration for batch processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum documents to chunk concurrently
    pub concurrency: usize,
    /// Whether to continue on individual document failures
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            continue_on_error: true,
        }
    }
}

/// Chunks produced for one document of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentChunks {
    /// Position of the document in the batch
    pub index: usize,
    pub filename: String,
    pub chunks: Vec<TextChunk>,
    pub total_tokens: usize,
}

/// Result of batch processing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub total_documents: usize,
    pub processed_documents: usize,
    pub failed_documents: usize,
    pub total_chunks: usize,
    pub errors: Vec<BatchError>,
}

/// Error during batch processing.
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub index: usize,
    pub filename: String,
    pub error: String,
}

/// Batch processor that chunks independent documents in parallel.
///
/// Each document is chunked on a blocking task and keeps its own id
/// sequence starting at 0.
pub struct BatchProcessor {
    engine: Arc<ChunkingEngine>,
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a new batch processor.
    pub fn new(engine: Arc<ChunkingEngine>, config: BatchConfig) -> Self {
        Self { engine, config }
    }

    /// Chunk every document, returning per-document chunks in input order.
    pub async fn process_batch(
        &self,
        documents: Vec<ProcessedDocument>,
        strategy: ChunkingStrategy,
    ) -> Result<(Vec<DocumentChunks>, BatchResult)> {
        let total_documents = documents.len();
        info!(total_documents, strategy = %strategy, "Starting batch processing");

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let tasks = documents.into_iter().enumerate().map(|(index, document)| {
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);
            async move {
                let filename = document.filename.clone();
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => chunk_blocking(engine, document, strategy).await,
                    Err(e) => Err(format!("Failed to acquire batch permit: {}", e)),
                };
                (index, filename, outcome)
            }
        });

        let mut outputs = Vec::new();
        let mut result = BatchResult {
            total_documents,
            ..Default::default()
        };

        for (index, filename, outcome) in join_all(tasks).await {
            if let Some(output) = self.record(&mut result, index, filename, outcome)? {
                outputs.push(output);
            }
        }

        info!(
            processed = result.processed_documents,
            failed = result.failed_documents,
            chunks = result.total_chunks,
            "Batch processing complete"
        );

        Ok((outputs, result))
    }

    /// Chunk documents one at a time, sending each result as soon as it is ready.
    pub async fn process_batch_streaming(
        &self,
        documents: Vec<ProcessedDocument>,
        strategy: ChunkingStrategy,
        sender: mpsc::Sender<DocumentChunks>,
    ) -> Result<BatchResult> {
        let mut result = BatchResult {
            total_documents: documents.len(),
            ..Default::default()
        };

        for (index, document) in documents.into_iter().enumerate() {
            let filename = document.filename.clone();
            let outcome = chunk_blocking(Arc::clone(&self.engine), document, strategy).await;

            if let Some(output) = self.record(&mut result, index, filename, outcome)? {
                if sender.send(output).await.is_err() {
                    warn!("Receiver dropped, stopping batch processing");
                    break;
                }
            }
        }

        Ok(result)
    }

    /// Fold one document's outcome into the batch totals.
    fn record(
        &self,
        result: &mut BatchResult,
        index: usize,
        filename: String,
        outcome: std::result::Result<Vec<TextChunk>, String>,
    ) -> Result<Option<DocumentChunks>> {
        match outcome {
            Ok(chunks) => {
                result.processed_documents += 1;
                result.total_chunks += chunks.len();
                Ok(Some(DocumentChunks {
                    index,
                    filename,
                    total_tokens: ChunkingEngine::total_tokens(&chunks),
                    chunks,
                }))
            }
            Err(error) => {
                if !self.config.continue_on_error {
                    return Err(anyhow!("Failed to chunk document {} ({}): {}", index, filename, error));
                }
                warn!(index, filename = %filename, error = %error, "Failed to chunk document");
                result.failed_documents += 1;
                result.errors.push(BatchError { index, filename, error });
                Ok(None)
            }
        }
    }
}

/// Chunk one document on the blocking pool. Chunking errors and task
/// failures both come back as the error message.
async fn chunk_blocking(
    engine: Arc<ChunkingEngine>,
    document: ProcessedDocument,
    strategy: ChunkingStrategy,
) -> std::result::Result<Vec<TextChunk>, String> {
    match tokio::task::spawn_blocking(move || engine.chunk_with(&document, strategy)).await {
        Ok(Ok(chunks)) => Ok(chunks),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("Chunking task failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunkers::TiktokenCounter;
    use crate::types::DocumentSection;

    fn processor(chunk_size: usize, chunk_overlap: usize, continue_on_error: bool) -> BatchProcessor {
        let engine = ChunkingEngine::new(chunk_size, chunk_overlap, Arc::new(TiktokenCounter::new()));
        BatchProcessor::new(
            Arc::new(engine),
            BatchConfig {
                concurrency: 2,
                continue_on_error,
            },
        )
    }

    fn documents() -> Vec<ProcessedDocument> {
        (0..5)
            .map(|i| {
                let sections = (0..=i)
                    .map(|s| DocumentSection::new(format!("S{}", s), format!("Content of section {}.", s), 1))
                    .collect();
                ProcessedDocument::new(format!("Document {}.", i), sections).with_filename(format!("doc{}.md", i))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_ids() {
        let processor = processor(100, 10, true);
        let (outputs, result) = processor
            .process_batch(documents(), ChunkingStrategy::Section)
            .await
            .unwrap();

        assert_eq!(result.total_documents, 5);
        assert_eq!(result.processed_documents, 5);
        assert_eq!(result.total_chunks, 1 + 2 + 3 + 4 + 5);
        for (i, output) in outputs.iter().enumerate() {
            assert_eq!(output.index, i);
            assert_eq!(output.filename, format!("doc{}.md", i));
            let ids: Vec<usize> = output.chunks.iter().map(|c| c.chunk_id).collect();
            assert_eq!(ids, (0..=i).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_batch_records_failures() {
        let processor = processor(10, 10, true);
        let (outputs, result) = processor
            .process_batch(documents(), ChunkingStrategy::Fixed)
            .await
            .unwrap();

        assert!(outputs.is_empty());
        assert_eq!(result.failed_documents, 5);
        assert_eq!(result.errors[0].filename, "doc0.md");
        assert!(result.errors[0].error.contains("chunk_overlap"));
    }

    #[tokio::test]
    async fn test_batch_stops_on_error_when_configured() {
        let processor = processor(10, 10, false);
        let outcome = processor.process_batch(documents(), ChunkingStrategy::Fixed).await;
        assert!(outcome.is_err());
    }

    /// Counter that panics on marked text, standing in for a crashed task.
    struct PanickingCounter(TiktokenCounter);

    impl crate::chunkers::TokenCounter for PanickingCounter {
        fn encode(&self, text: &str) -> Vec<usize> {
            if text.contains("PANIC") {
                panic!("tokenizer crashed");
            }
            self.0.encode(text)
        }

        fn decode(&self, tokens: &[usize]) -> crate::error::Result<String> {
            self.0.decode(tokens)
        }
    }

    fn panicking_processor(continue_on_error: bool) -> BatchProcessor {
        let engine = ChunkingEngine::new(100, 10, Arc::new(PanickingCounter(TiktokenCounter::new())));
        BatchProcessor::new(
            Arc::new(engine),
            BatchConfig {
                concurrency: 2,
                continue_on_error,
            },
        )
    }

    fn documents_with_crash() -> Vec<ProcessedDocument> {
        let mut docs = documents();
        docs[2] = ProcessedDocument::new("PANIC", vec![DocumentSection::new("S", "PANIC here.", 1)])
            .with_filename("crash.md");
        docs
    }

    #[tokio::test]
    async fn test_crashed_task_is_recorded() {
        let processor = panicking_processor(true);
        let (outputs, result) = processor
            .process_batch(documents_with_crash(), ChunkingStrategy::Section)
            .await
            .unwrap();

        assert_eq!(result.processed_documents, 4);
        assert_eq!(result.failed_documents, 1);
        assert_eq!(result.errors[0].index, 2);
        assert_eq!(result.errors[0].filename, "crash.md");
        assert!(result.errors[0].error.contains("Chunking task failed"));
        let indices: Vec<usize> = outputs.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 3, 4]);
    }

    #[tokio::test]
    async fn test_crashed_task_aborts_when_configured() {
        let processor = panicking_processor(false);
        let outcome = processor
            .process_batch(documents_with_crash(), ChunkingStrategy::Section)
            .await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_streaming_records_crashed_task() {
        let processor = panicking_processor(true);
        let (sender, mut receiver) = mpsc::channel(8);

        let result = processor
            .process_batch_streaming(documents_with_crash(), ChunkingStrategy::Section, sender)
            .await
            .unwrap();

        let mut received = Vec::new();
        while let Some(output) = receiver.recv().await {
            received.push(output.index);
        }
        assert_eq!(received, vec![0, 1, 3, 4]);
        assert_eq!(result.errors[0].filename, "crash.md");
    }

    #[test]
    fn test_streaming() {
        let processor = processor(100, 0, true);
        let (sender, mut receiver) = mpsc::channel(8);

        let result = tokio_test::block_on(async {
            let result = processor
                .process_batch_streaming(documents(), ChunkingStrategy::Smart, sender)
                .await
                .unwrap();
            let mut received = Vec::new();
            while let Some(output) = receiver.recv().await {
                received.push(output.index);
            }
            assert_eq!(received, vec![0, 1, 2, 3, 4]);
            result
        });

        assert_eq!(result.processed_documents, 5);
        assert_eq!(result.total_chunks, 15);
    }
}
