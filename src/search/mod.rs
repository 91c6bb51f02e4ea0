//! Natural-language search over indexed frames
//!
//! Embeds the query with the same embedder that produced the stored
//! description vectors, asks the store for the nearest records, and
//! shapes them into client-facing hits with bounded similarity scores
//! and image URLs.

mod error;


pub use error::SearchError;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::ConfigError;
use crate::core::retry::{with_retry, RetryPolicy};
use crate::core::types::{frame_image_key, SearchHit, SearchResponse};
use crate::embedding::{embed_with_timeout, EmbeddingError, TextEmbedder};
use crate::vector::{Distance, ScoredRecord, VectorError, VectorStore};

/// Configuration for search requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Limit applied when a request does not carry one
    pub default_limit: usize,

    /// Upper bound on the per-request limit
    pub max_limit: usize,

    /// Base URL under which frame images are served
    pub base_url: String,

    /// Per-request query embedding time budget (milliseconds)
    pub embed_timeout_ms: u64,

    /// Retry policy for transient embedding and store failures
    pub retry: RetryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 4,
            max_limit: 20,
            base_url: "http://127.0.0.1:8000".to_string(),
            embed_timeout_ms: 10_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl SearchConfig {
    /// Validate the section; failures are fatal at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.default_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_limit < self.default_limit {
            return Err(ConfigError::InvalidValue {
                field: "search.max_limit".to_string(),
                reason: "must be at least search.default_limit".to_string(),
            });
        }
        Ok(())
    }
}

/// Answers natural-language queries against the indexed frames
///
/// Read-only over the store; requests are independent and safe to run
/// in parallel against a stable collection generation.
pub struct SearchService {
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn VectorStore>,
    config: SearchConfig,
}

impl SearchService {
    /// Create a search service over the given embedder and store
    ///
    /// Refuses to construct when the embedder does not match the
    /// collection's dimension or embedder version; a mismatched query
    /// space would rank nonsense instead of failing loudly.
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn VectorStore>,
        config: SearchConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
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
        Ok(Self {
            embedder,
            store,
            config,
        })
    }

    /// Find the frames most similar to a free-text query
    ///
    /// Results are ordered by non-increasing similarity; an empty
    /// collection yields an empty result list, not an error.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<SearchResponse, SearchError> {
        let limit = limit.unwrap_or(self.config.default_limit);
        if query.trim().is_empty() {
            return Err(SearchError::InvalidArgument {
                reason: "query must not be empty".to_string(),
            });
        }
        if limit == 0 {
            return Err(SearchError::InvalidArgument {
                reason: "limit must be positive".to_string(),
            });
        }
        if limit > self.config.max_limit {
            return Err(SearchError::InvalidArgument {
                reason: format!("limit must be at most {}", self.config.max_limit),
            });
        }

        let embedding = with_retry(&self.config.retry, EmbeddingError::is_retryable, || {
            embed_with_timeout(self.embedder.as_ref(), query, self.config.embed_timeout_ms)
        })
        .await?;

        let matches = with_retry(&self.config.retry, VectorError::is_retryable, || {
            self.store.query(&embedding, limit)
        })
        .await?;

        let results: Vec<SearchHit> = matches
            .into_iter()
            .map(|scored| self.shape_hit(scored))
            .collect();
        debug!(
            "Query '{}' returned {} results (limit: {})",
            query,
            results.len(),
            limit
        );

        Ok(SearchResponse {
            count: results.len(),
            results,
            query: query.to_string(),
        })
    }

    fn shape_hit(&self, scored: ScoredRecord) -> SearchHit {
        let similarity_score =
            similarity_from_distance(self.store.config().distance, scored.distance);
        SearchHit {
            image_url: image_url(
                &self.config.base_url,
                &scored.record.video_filename,
                scored.record.frame_number,
            ),
            record_id: scored.record.record_id,
            video_filename: scored.record.video_filename,
            frame_number: scored.record.frame_number,
            similarity_score,
        }
    }
}

/// Map a raw distance to a similarity score in [0, 1]
///
/// Cosine distance `d` in [0, 2] maps to `(2 - d) / 2`, which equals
/// `(1 + cos) / 2`. Euclidean distance maps to `1 / (1 + d)`. Both are
/// monotonic decreasing, so ascending distance order and descending
/// score order always agree, and scores are comparable across queries.
pub fn similarity_from_distance(distance: Distance, d: f32) -> f32 {
    let score = match distance {
        Distance::Cosine => (2.0 - d) / 2.0,
        Distance::Euclidean => 1.0 / (1.0 + d.max(0.0)),
    };
    score.clamp(0.0, 1.0)
}

/// URL of the served image for a frame
///
/// Pure function of `(video_filename, frame_number)`; the image bytes
/// themselves are stored and served externally.
pub fn image_url(base_url: &str, video_filename: &str, frame_number: u64) -> String {
    format!(
        "{}/frames/{}",
        base_url.trim_end_matches('/'),
        frame_image_key(video_filename, frame_number)
    )
}
