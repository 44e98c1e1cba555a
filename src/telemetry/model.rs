//! Trace batch schema.
//!
//! A minimal OTLP JSON trace model: only the fields the processor walks are
//! typed. Every other field on every level is kept in `extra` so a batch
//! survives a read/rewrite/write cycle without losing data.

use super::attributes::Attributes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level trace batch (`ExportTraceServiceRequest` in OTLP JSON)
///
/// Typed fields are `Option` so an absent field and an empty one serialize
/// back the way they were read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_spans: Option<Vec<ResourceSpans>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TraceBatch {
    pub fn resource_spans(&self) -> &[ResourceSpans] {
        self.resource_spans.as_deref().unwrap_or_default()
    }

    pub fn span_count(&self) -> usize {
        self.resource_spans()
            .iter()
            .flat_map(|rs| rs.scope_spans())
            .map(|ss| ss.spans().len())
            .sum()
    }
}

/// Spans produced by one resource (service/runtime)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpans {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_spans: Option<Vec<ScopeSpans>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceSpans {
    pub fn resource_attributes(&self) -> Option<&Attributes> {
        self.resource.as_ref().and_then(|r| r.attributes.as_ref())
    }

    pub fn scope_spans(&self) -> &[ScopeSpans] {
        self.scope_spans.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Spans from one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeSpans {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<Span>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScopeSpans {
    pub fn spans(&self) -> &[Span] {
        self.spans.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<SpanEvent>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Span {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn events(&self) -> &[SpanEvent] {
        self.events.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpanEvent {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}
