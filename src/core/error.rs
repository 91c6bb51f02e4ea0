//! Error types for framesearch
//!
//! Per-module error enums live next to their modules; this module holds
//! the configuration error (fatal at startup) and the umbrella error
//! exposed at the crate surface.

use thiserror::Error;

/// Result type alias for framesearch operations
pub type Result<T> = std::result::Result<T, FramesearchError>;

/// Main error type for framesearch
#[derive(Error, Debug)]
pub enum FramesearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Describe error: {0}")]
    Describe(#[from] crate::describe::DescribeError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] crate::embedding::EmbeddingError),

    #[error("Vector store error: {0}")]
    Vector(#[from] crate::vector::VectorError),

    #[error("Index error: {0}")]
    Index(#[from] crate::indexer::IndexError),

    #[error("Search error: {0}")]
    Search(#[from] crate::search::SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fatal startup-time configuration errors
///
/// The process must refuse to start on any of these; they are never
/// reported per-frame or per-request.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Label catalog is empty")]
    EmptyCatalog,

    #[error("Embedding dimension mismatch: collection expects {expected}, embedder produces {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedder version mismatch: collection was built with '{collection}', configured embedder is '{configured}'")]
    EmbedderVersionMismatch {
        collection: String,
        configured: String,
    },

    #[error("Distance metric mismatch: collection uses {collection}, configured {configured}")]
    MetricMismatch {
        collection: String,
        configured: String,
    },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to load configuration: {reason}")]
    LoadFailed { reason: String },
}
