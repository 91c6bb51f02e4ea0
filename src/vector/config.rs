//! Vector store configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Distance metric for vector similarity
///
/// Fixed for the lifetime of a collection; changing it requires a
/// recreate. Dot product is deliberately absent: it has no bounded
/// monotonic mapping into a [0, 1] similarity score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    /// Cosine distance (1 - cosine similarity, in [0, 2])
    #[default]
    Cosine,
    /// Euclidean distance (L2)
    Euclidean,
}

impl Distance {
    pub fn name(&self) -> &'static str {
        match self {
            Distance::Cosine => "cosine",
            Distance::Euclidean => "euclidean",
        }
    }
}

/// Main configuration for the vector store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Collection name
    pub collection_name: String,

    /// Vector dimension (must match the embedding model output)
    pub dimension: usize,

    /// Distance metric for similarity
    pub distance: Distance,

    /// Version of the embedder whose vectors this collection holds
    pub embedder_version: String,

    /// Snapshot file path (None disables persistence)
    pub snapshot_path: Option<PathBuf>,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            collection_name: "video_frames".to_string(),
            dimension: 384, // all-MiniLM-L6-v2 output dimension
            distance: Distance::default(),
            embedder_version: "all-MiniLM-L6-v2".to_string(),
            snapshot_path: None,
        }
    }
}

impl VectorStoreConfig {
    /// Create a new config with custom collection name
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Create a new config with custom vector dimension
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Create a new config with custom distance metric
    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }

    /// Create a new config with custom embedder version
    pub fn with_embedder_version(mut self, version: impl Into<String>) -> Self {
        self.embedder_version = version.into();
        self
    }

    /// Create a new config with a snapshot file path
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }
}
