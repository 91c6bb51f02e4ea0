//! Core types, configuration, and shared utilities

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use self::config::{AppConfig, StorageConfig};
pub use self::error::{ConfigError, FramesearchError, Result};
pub use self::retry::RetryPolicy;
pub use self::types::{Frame, FrameRecord, SearchHit, SearchResponse};
