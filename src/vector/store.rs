//! Vector store trait and embedded implementation
//!
//! The store owns all indexed frame records. The trait is the narrow
//! surface the indexer and search service program against, so the
//! embedded implementation can be swapped for a remote vector database
//! without touching either of them.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::config::{Distance, VectorStoreConfig};
use super::error::{VectorError, VectorResult};
use crate::core::error::{ConfigError, FramesearchError};
use crate::core::types::FrameRecord;

/// One nearest-neighbor match
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    /// The matched record
    pub record: FrameRecord,
    /// Raw distance to the query vector under the collection metric
    pub distance: f32,
}

/// Narrow persistence interface for frame records
///
/// At most one record exists per `record_id`; `upsert` overwrites.
/// `recreate` is mutually exclusive with concurrent upserts and
/// queries, so readers never observe a half-dropped collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Collection settings this store was opened with
    fn config(&self) -> &VectorStoreConfig;

    /// Insert or overwrite a record keyed by its `record_id`
    async fn upsert(&self, record: FrameRecord) -> VectorResult<()>;

    /// The `k` nearest records, ascending by distance
    ///
    /// Returns fewer than `k` when the collection holds fewer records.
    /// Equal distances order by ascending `record_id`.
    async fn query(&self, vector: &[f32], k: usize) -> VectorResult<Vec<ScoredRecord>>;

    /// Delete one record by id; true when it existed
    async fn delete(&self, record_id: &str) -> VectorResult<bool>;

    /// Drop every record and start a fresh collection generation
    async fn recreate(&self) -> VectorResult<()>;

    /// Number of stored records
    async fn count(&self) -> VectorResult<usize>;
}

/// Collection state guarded by one lock
///
/// The single lock is what makes recreate atomic from a reader's point
/// of view: queries hold the read half, recreate holds the write half
/// for its whole duration.
struct Collection {
    records: HashMap<String, FrameRecord>,
    generation: u64,
}

/// In-process vector store with optional JSON snapshot persistence
pub struct EmbeddedVectorStore {
    config: VectorStoreConfig,
    collection: RwLock<Collection>,
}

/// On-disk snapshot layout
///
/// The collection metadata travels with the records so a snapshot
/// written under one embedding space can never be silently loaded into
/// another.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    collection_name: String,
    dimension: usize,
    distance: Distance,
    embedder_version: String,
    records: Vec<FrameRecord>,
}

impl EmbeddedVectorStore {
    /// Create an empty store for the given collection settings
    pub fn new(config: VectorStoreConfig) -> Self {
        Self {
            config,
            collection: RwLock::new(Collection {
                records: HashMap::new(),
                generation: 0,
            }),
        }
    }

    /// Open a store, loading the snapshot when one exists
    ///
    /// A snapshot whose dimension, metric, or embedder version differ
    /// from the configured collection is a fatal configuration error,
    /// never a silent wrong-answer.
    pub async fn open(config: VectorStoreConfig) -> Result<Self, FramesearchError> {
        let store = Self::new(config);
        if let Some(path) = store.config.snapshot_path.clone() {
            if path.exists() {
                let loaded = store.load_snapshot(&path).await?;
                info!(
                    "Loaded {} records into collection '{}' from {:?}",
                    loaded, store.config.collection_name, path
                );
            }
        }
        Ok(store)
    }

    /// Current collection generation; bumped by every recreate
    pub async fn generation(&self) -> u64 {
        self.collection.read().await.generation
    }

    /// Fetch one record by id
    pub async fn get(&self, record_id: &str) -> Option<FrameRecord> {
        self.collection.read().await.records.get(record_id).cloned()
    }

    /// Write the current collection to the configured snapshot path
    ///
    /// No-op when persistence is disabled. The snapshot is written to a
    /// temporary file first and renamed into place, so a crash mid-write
    /// leaves the previous snapshot intact.
    pub async fn flush_snapshot(&self) -> VectorResult<()> {
        let Some(path) = self.config.snapshot_path.clone() else {
            debug!("Snapshot persistence disabled, skipping flush");
            return Ok(());
        };

        let collection = self.collection.read().await;
        let mut records: Vec<FrameRecord> = collection.records.values().cloned().collect();
        records.sort_by(|a, b| a.record_id.cmp(&b.record_id));
        let snapshot = Snapshot {
            collection_name: self.config.collection_name.clone(),
            dimension: self.config.dimension,
            distance: self.config.distance,
            embedder_version: self.config.embedder_version.clone(),
            records,
        };
        drop(collection);

        Self::write_snapshot_file(&path, &snapshot)?;
        debug!("Flushed snapshot to {:?}", path);
        Ok(())
    }

    fn write_snapshot_file(path: &Path, snapshot: &Snapshot) -> VectorResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_vec_pretty(snapshot).map_err(|e| VectorError::SnapshotCorrupted {
                reason: format!("failed to serialize snapshot: {}", e),
            })?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    async fn load_snapshot(&self, path: &Path) -> Result<usize, FramesearchError> {
        let bytes = std::fs::read(path).map_err(VectorError::Io)?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| VectorError::SnapshotCorrupted {
                reason: format!("failed to parse {:?}: {}", path, e),
            })?;

        if snapshot.dimension != self.config.dimension {
            return Err(ConfigError::DimensionMismatch {
                expected: self.config.dimension,
                actual: snapshot.dimension,
            }
            .into());
        }
        if snapshot.distance != self.config.distance {
            return Err(ConfigError::MetricMismatch {
                collection: snapshot.distance.name().to_string(),
                configured: self.config.distance.name().to_string(),
            }
            .into());
        }
        if snapshot.embedder_version != self.config.embedder_version {
            return Err(ConfigError::EmbedderVersionMismatch {
                collection: snapshot.embedder_version,
                configured: self.config.embedder_version.clone(),
            }
            .into());
        }

        let mut collection = self.collection.write().await;
        for record in &snapshot.records {
            if record.embedding.len() != self.config.dimension {
                return Err(VectorError::SnapshotCorrupted {
                    reason: format!(
                        "record '{}' has dimension {}, collection expects {}",
                        record.record_id,
                        record.embedding.len(),
                        self.config.dimension
                    ),
                }
                .into());
            }
        }
        collection.records = snapshot
            .records
            .into_iter()
            .map(|r| (r.record_id.clone(), r))
            .collect();
        Ok(collection.records.len())
    }

    fn validate_dimension(&self, vector: &[f32]) -> VectorResult<()> {
        if vector.len() != self.config.dimension {
            return Err(VectorError::InvalidDimension {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn distance_between(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.config.distance {
            Distance::Cosine => cosine_distance(a, b),
            Distance::Euclidean => euclidean_distance(a, b),
        }
    }
}

#[async_trait]
impl VectorStore for EmbeddedVectorStore {
    fn config(&self) -> &VectorStoreConfig {
        &self.config
    }

    async fn upsert(&self, record: FrameRecord) -> VectorResult<()> {
        self.validate_dimension(&record.embedding)?;

        let mut collection = self.collection.write().await;
        debug!("Upserting record '{}'", record.record_id);
        collection.records.insert(record.record_id.clone(), record);
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> VectorResult<Vec<ScoredRecord>> {
        self.validate_dimension(vector)?;

        let collection = self.collection.read().await;
        let mut scored: Vec<ScoredRecord> = collection
            .records
            .values()
            .map(|record| ScoredRecord {
                distance: self.distance_between(vector, &record.embedding),
                record: record.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record.record_id.cmp(&b.record.record_id))
        });
        scored.truncate(k);

        debug!("Query returned {} results (k: {})", scored.len(), k);
        Ok(scored)
    }

    async fn delete(&self, record_id: &str) -> VectorResult<bool> {
        let mut collection = self.collection.write().await;
        let removed = collection.records.remove(record_id).is_some();
        if removed {
            debug!("Deleted record '{}'", record_id);
        }
        Ok(removed)
    }

    async fn recreate(&self) -> VectorResult<()> {
        // The write lock spans the wipe and the snapshot rewrite, so no
        // reader can observe records from the previous generation.
        let mut collection = self.collection.write().await;
        let dropped = collection.records.len();
        collection.records.clear();
        collection.generation += 1;

        if let Some(path) = &self.config.snapshot_path {
            let snapshot = Snapshot {
                collection_name: self.config.collection_name.clone(),
                dimension: self.config.dimension,
                distance: self.config.distance,
                embedder_version: self.config.embedder_version.clone(),
                records: Vec::new(),
            };
            Self::write_snapshot_file(path, &snapshot)?;
        }

        info!(
            "Recreated collection '{}' (dropped {} records, generation {})",
            self.config.collection_name, dropped, collection.generation
        );
        Ok(())
    }

    async fn count(&self) -> VectorResult<usize> {
        Ok(self.collection.read().await.records.len())
    }
}

/// Cosine distance `1 - cos(a, b)`, in [0, 2]
///
/// A zero-norm vector has no direction; its distance to anything is
/// pinned to 1 (cosine 0).
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Euclidean (L2) distance
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}
