//! Structured logging setup
//!
//! Builds a `tracing-subscriber` registry with an environment filter
//! and console and/or file output. File output goes through a daily
//! rolling appender with a non-blocking writer; the guards returned in
//! `LoggingSystem` must stay alive for the lifetime of the process or
//! buffered log lines are lost.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Logging system errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for logging operations
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Log verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Structured JSON format for machine parsing
    Json,
}

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Output to console only
    #[default]
    Console,
    /// Output to file only
    File,
    /// Output to both console and file
    Both,
}

/// Main logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level; `RUST_LOG` overrides when set
    pub level: LogLevel,

    /// Log output format
    pub format: LogFormat,

    /// Log output destination
    pub output: LogOutput,

    /// Directory for log files (required for file output)
    pub log_directory: Option<PathBuf>,

    /// Include target (module path) in log output
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            log_directory: None,
            include_target: true,
        }
    }
}

/// Initialized logging state
///
/// Hold onto this for the process lifetime; dropping it detaches the
/// non-blocking file writers.
pub struct LoggingSystem {
    _guards: Vec<WorkerGuard>,
}

impl LoggingSystem {
    /// Initialize the global subscriber with the given configuration
    pub fn init(config: LoggingConfig) -> LoggingResult<Self> {
        let mut guards = Vec::new();
        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        if matches!(config.output, LogOutput::Console | LogOutput::Both) {
            layers.push(Self::console_layer(&config));
        }
        if matches!(config.output, LogOutput::File | LogOutput::Both) {
            let (layer, guard) = Self::file_layer(&config)?;
            layers.push(layer);
            guards.push(guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(Self::build_env_filter(&config))
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;

        Ok(Self { _guards: guards })
    }

    /// Environment filter from configuration, `RUST_LOG` winning
    fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
    }

    fn console_layer(config: &LoggingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer().with_target(config.include_target);
        match config.format {
            LogFormat::Text => layer.boxed(),
            LogFormat::Json => layer.json().boxed(),
        }
    }

    fn file_layer(
        config: &LoggingConfig,
    ) -> LoggingResult<(Box<dyn Layer<Registry> + Send + Sync>, WorkerGuard)> {
        let directory = config.log_directory.as_ref().ok_or_else(|| {
            LoggingError::InitializationError(
                "file output requires log_directory".to_string(),
            )
        })?;
        std::fs::create_dir_all(directory).map_err(|e| {
            LoggingError::DirectoryCreationError(format!(
                "failed to create log directory {:?}: {}",
                directory, e
            ))
        })?;

        let appender = RollingFileAppender::new(Rotation::DAILY, directory, "framesearch.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_target(config.include_target)
            .with_ansi(false)
            .with_writer(writer);
        let layer = match config.format {
            LogFormat::Text => layer.boxed(),
            LogFormat::Json => layer.json().boxed(),
        };
        Ok((layer, guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.output, LogOutput::Console);
        assert!(config.include_target);
    }

    #[test]
    fn test_level_strings_match_env_filter_directives() {
        for (level, expected) in [
            (LogLevel::Trace, "trace"),
            (LogLevel::Debug, "debug"),
            (LogLevel::Info, "info"),
            (LogLevel::Warn, "warn"),
            (LogLevel::Error, "error"),
        ] {
            assert_eq!(level.as_str(), expected);
        }
    }

    #[test]
    fn test_file_output_requires_directory() {
        let config = LoggingConfig {
            output: LogOutput::File,
            log_directory: None,
            ..Default::default()
        };
        let result = LoggingSystem::file_layer(&config);
        assert!(matches!(result, Err(LoggingError::InitializationError(_))));
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Json,
            output: LogOutput::Both,
            log_directory: Some(PathBuf::from("/tmp/logs")),
            include_target: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: LoggingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.level, LogLevel::Debug);
        assert_eq!(back.format, LogFormat::Json);
        assert_eq!(back.output, LogOutput::Both);
    }
}
