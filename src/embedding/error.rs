//! Error types for embedding operations

use thiserror::Error;

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Errors that can occur while embedding text
#[derive(Error, Debug, Clone)]
pub enum EmbeddingError {
    /// Model is not available (not loaded, still warming up, or gone)
    #[error("Embedding model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// Inference failed
    #[error("Inference failed: {reason}")]
    InferenceFailed { reason: String },

    /// Call exceeded its time budget
    #[error("Embedding timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Input text was rejected by the model
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl EmbeddingError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ModelUnavailable { .. }
                | EmbeddingError::InferenceFailed { .. }
                | EmbeddingError::Timeout { .. }
        )
    }

    /// Get suggested retry delay in milliseconds
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            // Wait for a cold model to finish loading
            EmbeddingError::ModelUnavailable { .. } => Some(1000),
            EmbeddingError::InferenceFailed { .. } => Some(100),
            EmbeddingError::Timeout { .. } => Some(500),
            EmbeddingError::InvalidInput { .. } => None,
        }
    }
}
