//! Stack trace processor for trace batches.
//!
//! Walks resource spans -> scope spans -> spans -> events and rewrites the
//! `exception.stacktrace` attribute of `exception` events, but only for
//! resources whose `telemetry.sdk.language` matches the configured tag.
//! Nothing else in the batch is touched.

use crate::resolver::StackTraceResolver;
use crate::telemetry::{AttributeAccess, ResourceSpans, Span, TraceBatch};
use crate::utils::config::{
    ProcessorConfig, EXCEPTION_EVENT_NAME, SDK_LANGUAGE_ATTRIBUTE, STACKTRACE_ATTRIBUTE,
};
use crate::utils::error::ProcessorError;
use log::{debug, info};
use std::ops::AddAssign;

/// Counters for one `process` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub resources_in_scope: usize,
    pub resources_skipped: usize,
    pub stack_traces: usize,
    pub stack_traces_changed: usize,
    pub frames_resolved: usize,
    pub frames_unresolved: usize,
}

impl AddAssign for ProcessStats {
    fn add_assign(&mut self, other: Self) {
        self.resources_in_scope += other.resources_in_scope;
        self.resources_skipped += other.resources_skipped;
        self.stack_traces += other.stack_traces;
        self.stack_traces_changed += other.stack_traces_changed;
        self.frames_resolved += other.frames_resolved;
        self.frames_unresolved += other.frames_unresolved;
    }
}

#[derive(Debug)]
enum ProcessorState {
    Created,
    Started(StackTraceResolver),
    Shutdown,
}

/// Rewrites minified web JS stack traces inside trace batches
///
/// Lifecycle: `new` -> `start` (loads source maps) -> `process`* -> `shutdown`.
/// `process` takes `&self` and may run from several threads at once.
#[derive(Debug)]
pub struct StackTraceProcessor {
    config: ProcessorConfig,
    state: ProcessorState,
}

impl StackTraceProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            state: ProcessorState::Created,
        }
    }

    /// Validate the config and populate the source map repository
    ///
    /// Starting twice is a no-op.
    ///
    /// # Errors
    /// * `ProcessorError::Config` - invalid configuration
    /// * `ProcessorError::Repository` - a source map directory cannot be listed
    /// * `ProcessorError::AlreadyShutdown` - `shutdown` was already called
    pub fn start(&mut self) -> Result<(), ProcessorError> {
        match self.state {
            ProcessorState::Started(_) => return Ok(()),
            ProcessorState::Shutdown => return Err(ProcessorError::AlreadyShutdown),
            ProcessorState::Created => {}
        }

        self.config.validate()?;
        let resolver = StackTraceResolver::from_config(&self.config)?;
        self.state = ProcessorState::Started(resolver);

        info!("Stack trace processor started (language: {})", self.config.sdk_language);
        Ok(())
    }

    /// Drop the repository; later `process` calls fail
    pub fn shutdown(&mut self) {
        if !matches!(self.state, ProcessorState::Shutdown) {
            debug!("Stack trace processor shut down");
        }
        self.state = ProcessorState::Shutdown;
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, ProcessorState::Started(_))
    }

    fn resolver(&self) -> Result<&StackTraceResolver, ProcessorError> {
        match &self.state {
            ProcessorState::Started(resolver) => Ok(resolver),
            ProcessorState::Created => Err(ProcessorError::NotStarted),
            ProcessorState::Shutdown => Err(ProcessorError::AlreadyShutdown),
        }
    }

    /// Rewrite stack traces of in-scope resources in place
    ///
    /// # Errors
    /// * `ProcessorError::NotStarted` / `AlreadyShutdown` - wrong lifecycle state.
    ///   Individual frames never produce errors.
    pub fn process(&self, batch: &mut TraceBatch) -> Result<ProcessStats, ProcessorError> {
        let resolver = self.resolver()?;
        let mut stats = ProcessStats::default();

        for resource_spans in batch.resource_spans.iter_mut().flatten() {
            if !self.in_scope(resource_spans) {
                stats.resources_skipped += 1;
                continue;
            }
            stats.resources_in_scope += 1;

            for scope_spans in resource_spans.scope_spans.iter_mut().flatten() {
                for span in scope_spans.spans.iter_mut().flatten() {
                    stats += process_span(span, resolver);
                }
            }
        }

        debug!(
            "Processed batch: {} resources in scope, {} stack traces, {} frames resolved, {} unresolved",
            stats.resources_in_scope,
            stats.stack_traces,
            stats.frames_resolved,
            stats.frames_unresolved
        );

        Ok(stats)
    }

    fn in_scope(&self, resource_spans: &ResourceSpans) -> bool {
        resource_spans
            .resource_attributes()
            .and_then(|attributes| attributes.get_str(SDK_LANGUAGE_ATTRIBUTE))
            == Some(self.config.sdk_language.as_str())
    }
}

/// Rewrite the stack traces of every exception event of a span
///
/// **Private** - internal helper for process
fn process_span(span: &mut Span, resolver: &StackTraceResolver) -> ProcessStats {
    let mut stats = ProcessStats::default();

    for event in span
        .events
        .iter_mut()
        .flatten()
        .filter(|e| e.name() == EXCEPTION_EVENT_NAME)
    {
        if let Some(attributes) = event.attributes.as_mut() {
            stats += rewrite_attribute(attributes, resolver);
        }
    }

    stats
}

/// Rewrite the stack trace attribute of one attribute set
///
/// **Public** - works on anything implementing [`AttributeAccess`]
///
/// The attribute is only written back when at least one frame resolved, so
/// unresolved traces stay byte-identical.
pub fn rewrite_attribute<A: AttributeAccess>(
    attributes: &mut A,
    resolver: &StackTraceResolver,
) -> ProcessStats {
    let mut stats = ProcessStats::default();

    let Some(stacktrace) = attributes.get_str(STACKTRACE_ATTRIBUTE) else {
        return stats;
    };

    let rewrite = resolver.rewrite(stacktrace);
    stats.stack_traces = 1;
    stats.frames_resolved = rewrite.resolved;
    stats.frames_unresolved = rewrite.unresolved;

    if rewrite.changed() {
        stats.stack_traces_changed = 1;
        attributes.put_str(STACKTRACE_ATTRIBUTE, rewrite.text);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Attributes;

    #[test]
    fn test_process_before_start() {
        let processor = StackTraceProcessor::new(ProcessorConfig::default());
        let mut batch = TraceBatch::default();
        assert!(matches!(
            processor.process(&mut batch),
            Err(ProcessorError::NotStarted)
        ));
    }

    #[test]
    fn test_lifecycle() {
        let mut processor = StackTraceProcessor::new(ProcessorConfig::default());
        processor.start().unwrap();
        assert!(processor.is_started());

        // Second start is a no-op
        processor.start().unwrap();

        let mut batch = TraceBatch::default();
        assert_eq!(processor.process(&mut batch).unwrap(), ProcessStats::default());

        processor.shutdown();
        assert!(!processor.is_started());
        assert!(matches!(
            processor.process(&mut batch),
            Err(ProcessorError::AlreadyShutdown)
        ));
        assert!(matches!(processor.start(), Err(ProcessorError::AlreadyShutdown)));
    }

    #[test]
    fn test_start_with_missing_directory() {
        let config = ProcessorConfig {
            source_map_directories: vec!["/nonexistent/maps".into()],
            ..ProcessorConfig::default()
        };
        let mut processor = StackTraceProcessor::new(config);
        assert!(matches!(processor.start(), Err(ProcessorError::Repository(_))));
        assert!(!processor.is_started());
    }

    #[test]
    fn test_rewrite_attribute_without_stacktrace() {
        let resolver = StackTraceResolver::default();
        let mut attributes = Attributes::new().with_str("exception.type", "TypeError");
        let stats = rewrite_attribute(&mut attributes, &resolver);
        assert_eq!(stats.stack_traces, 0);
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_stats_add_assign() {
        let mut total = ProcessStats {
            frames_resolved: 2,
            ..ProcessStats::default()
        };
        total += ProcessStats {
            frames_resolved: 3,
            stack_traces: 1,
            ..ProcessStats::default()
        };
        assert_eq!(total.frames_resolved, 5);
        assert_eq!(total.stack_traces, 1);
    }
}
