use crate::utils::config::{load_config, LoadStrategyKind, ProcessorConfig};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Source map options shared by the `process` and `resolve` commands
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct SourceMapArgs {
    /// TOML config file (optional)
    pub config: Option<PathBuf>,

    /// Directories eagerly scanned for source maps; replaces the config's list
    pub source_map_dirs: Vec<PathBuf>,

    /// Directory to read maps from on first use (switches to lazy loading)
    pub lazy_dir: Option<PathBuf>,

    /// SDK language tag override
    pub language: Option<String>,
}

impl SourceMapArgs {
    /// Merge the config file (or defaults) with command line overrides
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ProcessorConfig::default(),
        };

        if !self.source_map_dirs.is_empty() {
            config.source_map_directories = self.source_map_dirs.clone();
        }

        if let Some(dir) = &self.lazy_dir {
            config.load_strategy = LoadStrategyKind::Lazy;
            config.lazy_base_path = Some(dir.clone());
        }

        if let Some(language) = &self.language {
            config.sdk_language = language.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Arguments for the process command
#[derive(Debug, Clone)]
pub struct ProcessArgs {
    /// OTLP JSON trace batch to read
    pub input: PathBuf,

    /// Where to write the processed batch
    pub output: PathBuf,

    pub source_maps: SourceMapArgs,

    /// Print processing counters to stdout
    pub print_summary: bool,
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("traces.json"),
            output: PathBuf::from("traces.resolved.json"),
            source_maps: SourceMapArgs::default(),
            print_summary: false,
        }
    }
}

/// Arguments for the resolve command
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    /// File with raw stack trace text; stdin when absent
    pub input: Option<PathBuf>,

    pub source_maps: SourceMapArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_config_defaults() {
        let config = SourceMapArgs::default().to_config().unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn test_to_config_overrides() {
        let args = SourceMapArgs {
            source_map_dirs: vec![PathBuf::from("dist")],
            lazy_dir: Some(PathBuf::from("maps")),
            language: Some("browser".to_string()),
            ..Default::default()
        };

        let config = args.to_config().unwrap();
        assert_eq!(config.source_map_directories, vec![PathBuf::from("dist")]);
        assert_eq!(config.load_strategy, LoadStrategyKind::Lazy);
        assert_eq!(config.lazy_base_path, Some(PathBuf::from("maps")));
        assert_eq!(config.sdk_language, "browser");
    }

    #[test]
    fn test_to_config_empty_language() {
        let args = SourceMapArgs {
            language: Some(String::new()),
            ..Default::default()
        };
        assert!(args.to_config().is_err());
    }
}
