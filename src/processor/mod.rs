//! Telemetry processor.
//!
//! Applies the stack trace resolver to trace batches, scoped by the
//! resource's SDK language tag.

pub mod stacktrace;

// Re-export main types and functions
pub use stacktrace::{rewrite_attribute, ProcessStats, StackTraceProcessor};
