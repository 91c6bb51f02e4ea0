//! Vector storage and nearest-neighbor retrieval
//!
//! Persists frame records keyed by their stable record id and answers
//! nearest-neighbor queries under a fixed distance metric. The metric,
//! dimension, and embedder version are pinned per collection; changing
//! any of them requires a recreate.

mod config;
mod error;
mod store;

#[cfg(test)]
mod tests;

pub use self::config::{Distance, VectorStoreConfig};
pub use self::error::{VectorError, VectorResult};
pub use self::store::{EmbeddedVectorStore, ScoredRecord, VectorStore};
