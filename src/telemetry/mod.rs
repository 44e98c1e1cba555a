//! Telemetry record model.
//!
//! Serde types for OTLP JSON trace batches and the typed attribute accessor
//! the processor uses to read and replace stack traces.

pub mod attributes;
pub mod model;

// Re-export main types
pub use attributes::{AnyValue, AttributeAccess, Attributes, KeyValue};
pub use model::{Resource, ResourceSpans, ScopeSpans, Span, SpanEvent, TraceBatch};
