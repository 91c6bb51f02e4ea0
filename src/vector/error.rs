//! Vector store error types

use thiserror::Error;

/// Result type for vector operations
pub type VectorResult<T> = Result<T, VectorError>;

/// Vector store specific errors
#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Vector store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Snapshot corrupted: {reason}")]
    SnapshotCorrupted { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VectorError {
    /// Check if the error is retryable
    ///
    /// Dimension violations and corrupted snapshots never heal on
    /// retry; an unavailable backend might.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VectorError::Unavailable { .. })
    }

    /// Get suggested retry delay in milliseconds
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            VectorError::Unavailable { .. } => Some(500),
            _ => None,
        }
    }
}
