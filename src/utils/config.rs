//! Configuration and constants for the processor.

use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of source map files, also appended to a bundle basename to form a map key
pub const SOURCE_MAP_EXTENSION: &str = ".map";

/// Separates the call label from the location in a stack frame line
pub const FRAME_SEPARATOR: char = '@';

/// Separates path segments inside a frame location (URL or file path)
pub const PATH_SEPARATOR: char = '/';

/// Separates basename, line and column in the trailing location unit
pub const POSITION_SEPARATOR: char = ':';

// Telemetry attribute and event names (OpenTelemetry semantic conventions)
pub const SDK_LANGUAGE_ATTRIBUTE: &str = "telemetry.sdk.language";
pub const EXCEPTION_EVENT_NAME: &str = "exception";
pub const STACKTRACE_ATTRIBUTE: &str = "exception.stacktrace";

/// Upper bound on map keys remembered as failed lazy loads
pub const MAX_CACHED_MISSES: usize = 1024;

/// SDK language tag of records this processor rewrites
pub const DEFAULT_SDK_LANGUAGE: &str = "webjs";

/// How source maps are brought into the repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategyKind {
    /// Scan the configured directories once at startup
    #[default]
    Eager,
    /// Read a map from the base path the first time it is requested
    Lazy,
}

/// Processor configuration
///
/// Loaded from TOML. Keys use camelCase to match collector config conventions:
///
/// ```toml
/// sourceMapDirectories = ["dist/maps"]
/// loadStrategy = "eager"
/// sdkLanguage = "webjs"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorConfig {
    /// Directories eagerly scanned for "*.map" files at startup; empty disables eager loading
    pub source_map_directories: Vec<PathBuf>,

    /// Eager directory scan or lazy per-file loading
    pub load_strategy: LoadStrategyKind,

    /// Directory lazily loaded maps are read from
    pub lazy_base_path: Option<PathBuf>,

    /// Value of `telemetry.sdk.language` that marks a resource as in scope
    pub sdk_language: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            source_map_directories: Vec::new(),
            load_strategy: LoadStrategyKind::Eager,
            lazy_base_path: None,
            sdk_language: DEFAULT_SDK_LANGUAGE.to_string(),
        }
    }
}

impl ProcessorConfig {
    /// Check that the combination of options is usable
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - lazy strategy without a base path, or an empty language tag
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_strategy == LoadStrategyKind::Lazy && self.lazy_base_path.is_none() {
            return Err(ConfigError::Invalid(
                "loadStrategy \"lazy\" requires lazyBasePath".to_string(),
            ));
        }

        if self.sdk_language.is_empty() {
            return Err(ConfigError::Invalid("sdkLanguage must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Load processor configuration from a TOML file
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::Invalid` - If the options contradict each other
///
/// # Example
/// ```ignore
/// let config = load_config("stacktrace.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ProcessorConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: ProcessorConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();
        assert!(config.source_map_directories.is_empty());
        assert_eq!(config.load_strategy, LoadStrategyKind::Eager);
        assert_eq!(config.sdk_language, "webjs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: ProcessorConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
sourceMapDirectories = ["maps/a", "maps/b"]
loadStrategy = "eager"
sdkLanguage = "browserjs"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.source_map_directories,
            vec![PathBuf::from("maps/a"), PathBuf::from("maps/b")]
        );
        assert_eq!(config.sdk_language, "browserjs");
    }

    #[test]
    fn test_lazy_requires_base_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"loadStrategy = "lazy""#).unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sourceMapDirectories = 42").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }
}
