//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Only startup failures surface as errors. Per-frame problems (unparsable
//! lines, missing maps, uncovered positions) degrade to passthrough text and
//! never reach these types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while populating the source map repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Failed to list source map directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while reading or decoding a single source map
#[derive(Error, Debug)]
pub enum SourceMapError {
    #[error("Failed to read source map {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid source map: {0}")]
    DecodeFailed(#[from] sourcemap::Error),

    #[error("Refusing to load source map with non-file key: {0}")]
    InvalidKey(String),

    #[error("Source map {0} failed to load earlier")]
    Missing(String),
}

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur in the processor lifecycle
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Processor has not been started")]
    NotStarted,

    #[error("Processor has already been shut down")]
    AlreadyShutdown,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors that can occur during batch file input/output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
