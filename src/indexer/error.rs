//! Error types for frame indexing

use thiserror::Error;

use crate::describe::DescribeError;
use crate::embedding::EmbeddingError;
use crate::vector::VectorError;

/// Errors for a single frame, never the whole batch
///
/// Batch indexing collects these per frame into the summary instead of
/// aborting the run.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The frame source failed before producing a frame
    #[error("Frame source failed: {reason}")]
    Source { reason: String },

    #[error("Describe failed: {0}")]
    Describe(#[from] DescribeError),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector store failed: {0}")]
    Store(#[from] VectorError),
}
