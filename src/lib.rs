//! Semantic frame indexing and retrieval engine
//!
//! Turns still frames sampled from a video library into compact
//! natural-language descriptions by scoring them against a fixed label
//! vocabulary, embeds descriptions and queries into one shared vector
//! space, and answers nearest-neighbor searches with deterministic
//! ordering and bounded similarity scores.
//!
//! Video decoding, the embedding and affinity models, image storage,
//! and the HTTP transport are external collaborators behind the narrow
//! traits in [`indexer`], [`embedding`], [`describe`], and [`vector`].

pub mod catalog;
pub mod core;
pub mod describe;
pub mod embedding;
pub mod indexer;
pub mod logging;
pub mod search;
pub mod vector;

pub use crate::catalog::{CatalogMode, Label, LabelCatalog, LabelCategory};
pub use crate::core::config::AppConfig;
pub use crate::core::error::{ConfigError, FramesearchError, Result};
pub use crate::core::types::{Frame, FrameRecord, SearchHit, SearchResponse};
pub use crate::describe::{AffinityScorer, Description, FrameDescriber};
pub use crate::embedding::TextEmbedder;
pub use crate::indexer::{FrameIndexer, FrameSource, IndexSummary, ReindexOptions, StopSignal};
pub use crate::search::SearchService;
pub use crate::vector::{Distance, EmbeddedVectorStore, VectorStore};
