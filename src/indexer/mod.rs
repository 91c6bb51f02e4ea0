//! Batch frame indexing
//!
//! Pulls the sampled frame sequence from the external frame source,
//! runs describe + embed per frame through a bounded worker pool, and
//! upserts the resulting records. One bad frame never aborts the run;
//! per-frame outcomes aggregate into a summary the caller inspects.

mod error;


pub use error::IndexError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::ConfigError;
use crate::core::retry::{with_retry, RetryPolicy};
use crate::core::types::{video_stem, Frame, FrameRecord};
use crate::describe::FrameDescriber;
use crate::embedding::{embed_with_timeout, EmbeddingError, TextEmbedder};
use crate::vector::{VectorError, VectorStore};

/// External producer of the sampled frame sequence
///
/// Each call to `frames` restarts the sequence from the beginning. The
/// engine only consumes the sequence; it never re-derives frames from
/// video files.
pub trait FrameSource: Send + Sync {
    fn frames(&self) -> BoxStream<'_, Result<Frame, IndexError>>;
}

/// Configuration for batch indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Upper bound on frames described and embedded concurrently
    pub max_concurrent: usize,

    /// Per-frame embedding time budget (milliseconds)
    pub embed_timeout_ms: u64,

    /// Retry policy for transient embedding and store failures
    pub retry: RetryPolicy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            embed_timeout_ms: 30_000,
            retry: RetryPolicy::default(),
        }
    }
}

/// Cooperative stop signal for batch indexing
///
/// Checked between frames: in-flight frames finish, later frames are
/// never started, and the store stays consistent. Progress made before
/// the stop is kept and re-indexing resumes idempotently.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the current batch stop after in-flight frames
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arm the signal for another batch
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Outcome of indexing one frame
#[derive(Debug, Clone)]
pub struct IndexedFrame {
    /// The record now stored in the collection
    pub record: FrameRecord,
    /// True when the description fell back instead of label scoring
    pub degraded: bool,
}

/// One failed frame in a batch
#[derive(Debug)]
pub struct FrameFailure {
    /// Record id of the failed frame; None when the source itself
    /// failed before producing one
    pub record_id: Option<String>,
    /// What went wrong
    pub error: IndexError,
}

/// Aggregated outcome of one batch indexing run
#[derive(Debug, Default)]
pub struct IndexSummary {
    /// Frames indexed successfully
    pub indexed: usize,
    /// Frames skipped after their error was recorded
    pub failed: usize,
    /// Indexed frames that used the fallback description
    pub degraded: usize,
    /// Per-frame failure details
    pub failures: Vec<FrameFailure>,
}

/// Options for the admin reindex operation
#[derive(Debug, Clone, Copy, Default)]
pub struct ReindexOptions {
    /// Drop the collection before indexing
    ///
    /// Required when the label catalog or the embedder version changes,
    /// since records from different embedding spaces must never mix.
    pub recreate: bool,
}

/// Indexes frames into the vector store
pub struct FrameIndexer {
    describer: Arc<FrameDescriber>,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn VectorStore>,
    config: IndexerConfig,
    stop: StopSignal,
}

impl FrameIndexer {
    /// Create an indexer over the given describer, embedder, and store
    ///
    /// Refuses to construct when the embedder does not match the
    /// collection's dimension or embedder version; mixing embedding
    /// spaces within one collection is invalid.
    pub fn new(
        describer: Arc<FrameDescriber>,
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn VectorStore>,
        config: IndexerConfig,
    ) -> Result<Self, ConfigError> {
        let collection = store.config();
        if embedder.dimension() != collection.dimension {
            return Err(ConfigError::DimensionMismatch {
                expected: collection.dimension,
                actual: embedder.dimension(),
            });
        }
        if embedder.version() != collection.embedder_version {
            return Err(ConfigError::EmbedderVersionMismatch {
                collection: collection.embedder_version.clone(),
                configured: embedder.version().to_string(),
            });
        }
        if config.max_concurrent == 0 {
            return Err(ConfigError::InvalidValue {
                field: "indexer.max_concurrent".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            describer,
            embedder,
            store,
            config,
            stop: StopSignal::new(),
        })
    }

    /// Handle for requesting a graceful stop of the running batch
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Describe, embed, and upsert one frame
    ///
    /// Re-running on an unchanged frame produces the same record id and
    /// overwrites the prior record, so indexing is idempotent.
    pub async fn index_frame(&self, frame: &Frame) -> Result<IndexedFrame, IndexError> {
        let record_id = frame.record_id();

        let description = self.describer.describe(&frame.image).await?;
        let document = compose_document(&description.text, &frame.video_filename);

        let embedding = with_retry(&self.config.retry, EmbeddingError::is_retryable, || {
            embed_with_timeout(
                self.embedder.as_ref(),
                &document,
                self.config.embed_timeout_ms,
            )
        })
        .await?;

        let record = FrameRecord {
            record_id,
            video_filename: frame.video_filename.clone(),
            frame_number: frame.frame_number,
            timestamp_secs: frame.timestamp_secs,
            description: description.text,
            embedding,
        };

        with_retry(&self.config.retry, VectorError::is_retryable, || {
            let record = record.clone();
            async move { self.store.upsert(record).await }
        })
        .await?;

        Ok(IndexedFrame {
            record,
            degraded: description.degraded,
        })
    }

    /// Index every frame the source produces
    ///
    /// Frames flow through a worker pool bounded by `max_concurrent`.
    /// Failures are recorded per frame and the batch continues; the
    /// stop signal is honored between frames.
    pub async fn index_batch(&self, source: &dyn FrameSource) -> IndexSummary {
        let mut summary = IndexSummary::default();

        let mut outcomes = source
            .frames()
            .take_while(|_| std::future::ready(!self.stop.is_triggered()))
            .map(|next| async move {
                match next {
                    Ok(frame) => {
                        let record_id = frame.record_id();
                        (Some(record_id), self.index_frame(&frame).await)
                    }
                    Err(error) => (None, Err(error)),
                }
            })
            .buffer_unordered(self.config.max_concurrent);

        while let Some((record_id, outcome)) = outcomes.next().await {
            match outcome {
                Ok(indexed) => {
                    summary.indexed += 1;
                    if indexed.degraded {
                        summary.degraded += 1;
                    }
                }
                Err(error) => {
                    warn!(
                        "Skipping frame {}: {}",
                        record_id.as_deref().unwrap_or("<source>"),
                        error
                    );
                    summary.failed += 1;
                    summary.failures.push(FrameFailure { record_id, error });
                }
            }
        }

        if self.stop.is_triggered() {
            info!(
                "Batch indexing stopped early: {} indexed ({} degraded), {} failed",
                summary.indexed, summary.degraded, summary.failed
            );
        } else {
            info!(
                "Batch indexing finished: {} indexed ({} degraded), {} failed",
                summary.indexed, summary.degraded, summary.failed
            );
        }
        summary
    }

    /// Full rebuild or incremental update of the collection
    ///
    /// With `recreate` the collection is dropped first and every frame
    /// is re-described and re-embedded; without it, existing records
    /// are overwritten in place as the source replays them.
    pub async fn reindex(
        &self,
        source: &dyn FrameSource,
        options: ReindexOptions,
    ) -> Result<IndexSummary, IndexError> {
        if options.recreate {
            info!(
                "Recreating collection '{}' before reindex",
                self.store.config().collection_name
            );
            self.store.recreate().await?;
        }
        Ok(self.index_batch(source).await)
    }
}

/// The text actually embedded for a frame
///
/// The description plus video context, with separator characters in the
/// video stem turned into spaces so the video name contributes plain
/// words to the embedding.
pub fn compose_document(description: &str, video_filename: &str) -> String {
    let stem = video_stem(video_filename).replace(['_', '-'], " ");
    format!("{}. Video: {}", description, stem)
}
