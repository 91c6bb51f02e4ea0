//! Error types for search requests

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vector::VectorError;

/// Errors for a single search request
#[derive(Error, Debug)]
pub enum SearchError {
    /// Request rejected before touching the store; no state change
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Embedding the query failed after bounded retries
    #[error("Failed to embed query: {0}")]
    QueryEmbedding(#[from] EmbeddingError),

    /// The store failed after bounded retries
    ///
    /// Surfaced as a service error, never as a silently empty result.
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(#[from] VectorError),
}
