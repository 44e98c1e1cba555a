//! Stack trace resolution engine.
//!
//! Owns one source map repository and runs parse -> resolve -> render for a
//! stack trace string. Safe to share between threads once built.

use super::position::resolve_stack_trace;
use crate::output::render_stack_trace;
use crate::parser::parse_stack_trace;
use crate::source_map::{LoadStrategy, SourceMapRepository};
use crate::utils::config::{LoadStrategyKind, ProcessorConfig};
use crate::utils::error::RepositoryError;
use log::info;

/// Outcome of rewriting one stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub frames: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        self.resolved > 0
    }
}

/// Rewrites minified stack traces using the maps in its repository
#[derive(Debug, Default)]
pub struct StackTraceResolver {
    repository: SourceMapRepository,
}

impl StackTraceResolver {
    pub fn new(repository: SourceMapRepository) -> Self {
        Self { repository }
    }

    /// Build the repository described by `config` and load eager directories
    ///
    /// # Errors
    /// * `RepositoryError::DirectoryRead` - a configured directory cannot be listed
    pub fn from_config(config: &ProcessorConfig) -> Result<Self, RepositoryError> {
        let strategy = match (&config.load_strategy, &config.lazy_base_path) {
            (LoadStrategyKind::Lazy, Some(base_path)) => LoadStrategy::LazyCached {
                base_path: base_path.clone(),
            },
            _ => LoadStrategy::Eager,
        };

        let repository = SourceMapRepository::new(strategy);
        repository.load_all(config.source_map_directories.as_slice())?;

        info!(
            "Source map repository ready: {} maps cached ({:?})",
            repository.len(),
            repository.strategy()
        );

        Ok(Self { repository })
    }

    pub fn repository(&self) -> &SourceMapRepository {
        &self.repository
    }

    /// Rewrite a stack trace, returning the text and frame counts
    pub fn rewrite(&self, text: &str) -> Rewrite {
        let trace = resolve_stack_trace(parse_stack_trace(text), &self.repository);

        Rewrite {
            text: render_stack_trace(&trace),
            frames: trace.len(),
            resolved: trace.resolved_count(),
            unresolved: trace.unresolved_count(),
        }
    }

    /// Rewrite a stack trace, returning only the text
    pub fn rewrite_text(&self, text: &str) -> String {
        self.rewrite(text).text
    }
}
