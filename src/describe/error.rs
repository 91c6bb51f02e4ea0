//! Error types for frame description

use thiserror::Error;

/// Errors that can occur while describing a frame
#[derive(Error, Debug, Clone)]
pub enum DescribeError {
    /// Frame image bytes could not be decoded
    #[error("Failed to read frame image: {reason}")]
    FrameRead { reason: String },

    /// Affinity scoring failed
    #[error("Label scoring failed: {reason}")]
    ScoringFailed { reason: String },

    /// Scoring exceeded its time budget
    #[error("Label scoring timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl DescribeError {
    /// Check if this error is retryable
    ///
    /// A frame that does not decode will never decode; scoring hiccups
    /// (model cold-start, transient inference failures) may pass.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DescribeError::ScoringFailed { .. } | DescribeError::Timeout { .. }
        )
    }
}
