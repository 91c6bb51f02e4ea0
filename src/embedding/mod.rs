//! Text embedding interface
//!
//! The embedding model is an external collaborator: a heavy,
//! process-wide resource constructed once and passed by reference into
//! the indexer and search service. This module defines the narrow
//! trait the engine consumes plus the configuration describing the
//! expected model. Descriptions and queries MUST go through the same
//! embedder; mixing embedding spaces within one collection is refused
//! at construction time.

mod error;

#[cfg(test)]
mod tests;

pub use error::{EmbeddingError, EmbeddingResult};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text embedding function over a fixed vector space
///
/// Implementations must be deterministic for identical input and must
/// produce vectors of exactly `dimension()` length. `version()`
/// identifies the embedding space; two embedders with different
/// versions are never interchangeable.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a single text string
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Output vector dimension
    fn dimension(&self) -> usize;

    /// Identifier of the embedding space (model name + revision)
    fn version(&self) -> &str;
}

/// Expected embedding model, used for startup validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model name
    pub model_name: String,

    /// Embedding space identifier checked against the collection
    pub version: String,

    /// Output vector dimension
    pub dimension: usize,

    /// Per-call time budget in milliseconds
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: "all-MiniLM-L6-v2".to_string(),
            version: "all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            timeout_ms: 30_000,
        }
    }
}

/// Embed with the configured time budget
///
/// Wraps `embedder.embed` in a timeout so a wedged model call can
/// never stall a batch or a search request indefinitely.
pub async fn embed_with_timeout(
    embedder: &dyn TextEmbedder,
    text: &str,
    timeout_ms: u64,
) -> EmbeddingResult<Vec<f32>> {
    let budget = std::time::Duration::from_millis(timeout_ms);
    match tokio::time::timeout(budget, embedder.embed(text)).await {
        Ok(result) => result,
        Err(_) => Err(EmbeddingError::Timeout { timeout_ms }),
    }
}
