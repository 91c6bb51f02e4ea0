//! Application configuration
//!
//! Composes the per-module configuration sections and loads them from
//! an optional file plus `FRAMESEARCH_`-prefixed environment variables.
//! All sections have working defaults; validation happens at load time
//! and failures are fatal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogMode;
use crate::core::error::ConfigError;
use crate::embedding::EmbeddingConfig;
use crate::indexer::IndexerConfig;
use crate::logging::LoggingConfig;
use crate::search::SearchConfig;
use crate::vector::VectorStoreConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frame image storage and serving
    pub storage: StorageConfig,

    /// Which builtin label catalog to load
    pub catalog_mode: CatalogMode,

    /// Expected embedding model
    pub embedding: EmbeddingConfig,

    /// Vector collection settings
    pub vector: VectorStoreConfig,

    /// Batch indexing settings
    pub indexer: IndexerConfig,

    /// Search request settings
    pub search: SearchConfig,

    /// Logging setup
    pub logging: LoggingConfig,
}

/// Directories for frame images and store snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding extracted frame images
    pub frames_dir: PathBuf,

    /// Directory for vector store snapshots (None disables persistence)
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("", "", "framesearch")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("data"));
        Self {
            frames_dir: data_dir.join("frames"),
            snapshot_dir: Some(data_dir.join("store")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            catalog_mode: CatalogMode::default(),
            embedding: EmbeddingConfig::default(),
            vector: VectorStoreConfig::default(),
            indexer: IndexerConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file, and
    /// `FRAMESEARCH_`-prefixed environment variables (highest priority)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default()).map_err(|e| {
            ConfigError::LoadFailed {
                reason: format!("failed to build default configuration: {}", e),
            }
        })?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("FRAMESEARCH").separator("__"),
        );

        let mut loaded: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::LoadFailed {
                reason: e.to_string(),
            })?;

        // The vector snapshot lives under the storage directory unless
        // a path was set explicitly
        if loaded.vector.snapshot_path.is_none() {
            if let Some(dir) = &loaded.storage.snapshot_dir {
                loaded.vector.snapshot_path = Some(dir.join("collection.json"));
            }
        }

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate cross-section invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimension".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.vector.dimension != self.embedding.dimension {
            return Err(ConfigError::DimensionMismatch {
                expected: self.vector.dimension,
                actual: self.embedding.dimension,
            });
        }
        if self.vector.embedder_version != self.embedding.version {
            return Err(ConfigError::EmbedderVersionMismatch {
                collection: self.vector.embedder_version.clone(),
                configured: self.embedding.version.clone(),
            });
        }
        if self.indexer.max_concurrent == 0 {
            return Err(ConfigError::InvalidValue {
                field: "indexer.max_concurrent".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        self.search.validate()?;
        Ok(())
    }
}
