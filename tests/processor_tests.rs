use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;
use webjs_stacktrace::output::read_batch;
use webjs_stacktrace::processor::StackTraceProcessor;
use webjs_stacktrace::telemetry::{AttributeAccess, SpanEvent, TraceBatch};
use webjs_stacktrace::utils::config::{LoadStrategyKind, ProcessorConfig};

const MINIFIED: &str = "padStart@http://localhost:4203/lineSlicer.min.js:1:228\n\
                        padStart@http://localhost:4203/lineSlicers.min.js:1:228\n";
const RESOLVED: &str = "padStart@lib/lineSlicer.js:11:53\n\
                        padStart@http://localhost:4203/lineSlicers.min.js:1:228\n";

fn testdata(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(path)
}

fn started_processor() -> StackTraceProcessor {
    let config = ProcessorConfig {
        source_map_directories: vec![testdata("maps")],
        ..ProcessorConfig::default()
    };
    let mut processor = StackTraceProcessor::new(config);
    processor.start().unwrap();
    processor
}

fn batch(language: &str, event_name: &str, stacktrace: &str) -> TraceBatch {
    serde_json::from_value(json!({
        "resourceSpans": [{
            "resource": {
                "attributes": [
                    {"key": "telemetry.sdk.language", "value": {"stringValue": language}}
                ]
            },
            "scopeSpans": [{
                "spans": [{
                    "name": "@pi/error-handler",
                    "events": [{
                        "name": event_name,
                        "attributes": [
                            {"key": "exception.type", "value": {"stringValue": "TypeError"}},
                            {"key": "exception.stacktrace", "value": {"stringValue": stacktrace}}
                        ]
                    }]
                }]
            }]
        }]
    }))
    .unwrap()
}

fn first_event(batch: &TraceBatch) -> &SpanEvent {
    &batch.resource_spans()[0].scope_spans()[0].spans()[0].events()[0]
}

fn first_stacktrace(batch: &TraceBatch) -> &str {
    first_event(batch)
        .attributes
        .as_ref()
        .and_then(|attributes| attributes.get_str("exception.stacktrace"))
        .unwrap()
}

#[test]
fn test_process_fixture_batch() {
    let processor = started_processor();
    let mut batch = read_batch(testdata("batch.json")).unwrap();

    let stats = processor.process(&mut batch).unwrap();

    assert_eq!(first_stacktrace(&batch), RESOLVED);
    assert_eq!(stats.resources_in_scope, 1);
    assert_eq!(stats.stack_traces, 1);
    assert_eq!(stats.stack_traces_changed, 1);
    assert_eq!(stats.frames_resolved, 1);
    assert_eq!(stats.frames_unresolved, 1);

    // Other attributes and fields are untouched
    let event = first_event(&batch);
    let attributes = event.attributes.as_ref().unwrap();
    assert_eq!(attributes.len(), 3);
    assert_eq!(attributes.get_str("exception.type"), Some("TypeError"));
    assert_eq!(event.extra["timeUnixNano"], "1581452773000000123");
    assert_eq!(
        batch.resource_spans()[0].scope_spans()[0].spans()[0].extra["status"],
        json!({"code": 2})
    );
}

#[test]
fn test_other_language_untouched() {
    let processor = started_processor();
    let mut batch = batch("python", "exception", MINIFIED);
    let original = batch.clone();

    let stats = processor.process(&mut batch).unwrap();

    assert_eq!(batch, original);
    assert_eq!(stats.resources_skipped, 1);
    assert_eq!(stats.stack_traces, 0);
}

#[test]
fn test_out_of_scope_empty_fields_serialize_unchanged() {
    let processor = started_processor();
    let input = json!({
        "resourceSpans": [{
            "resource": {
                "attributes": [
                    {"key": "telemetry.sdk.language", "value": {"stringValue": "python"}}
                ]
            },
            "scopeSpans": [{
                "spans": [{"name": "", "events": [], "attributes": []}]
            }]
        }, {
            "resource": {"attributes": []},
            "scopeSpans": [{"spans": [{"events": [{"name": "", "attributes": []}]}]}]
        }]
    });
    let mut batch: TraceBatch = serde_json::from_value(input.clone()).unwrap();

    let stats = processor.process(&mut batch).unwrap();

    assert_eq!(stats.resources_skipped, 2);
    assert_eq!(serde_json::to_value(&batch).unwrap(), input);
}

#[test]
fn test_missing_language_untouched() {
    let processor = started_processor();
    let mut batch: TraceBatch = serde_json::from_value(json!({
        "resourceSpans": [{
            "scopeSpans": [{"spans": [{"events": [{
                "name": "exception",
                "attributes": [{"key": "exception.stacktrace", "value": {"stringValue": MINIFIED}}]
            }]}]}]
        }]
    }))
    .unwrap();
    let original = batch.clone();

    processor.process(&mut batch).unwrap();
    assert_eq!(batch, original);
}

#[test]
fn test_non_exception_events_untouched() {
    let processor = started_processor();
    let mut batch = batch("webjs", "log", MINIFIED);
    let original = batch.clone();

    processor.process(&mut batch).unwrap();
    assert_eq!(batch, original);
}

#[test]
fn test_configured_language() {
    let config = ProcessorConfig {
        source_map_directories: vec![testdata("maps")],
        sdk_language: "browser".to_string(),
        ..ProcessorConfig::default()
    };
    let mut processor = StackTraceProcessor::new(config);
    processor.start().unwrap();

    let mut in_scope = batch("browser", "exception", MINIFIED);
    processor.process(&mut in_scope).unwrap();
    assert_eq!(first_stacktrace(&in_scope), RESOLVED);

    let mut out_of_scope = batch("webjs", "exception", MINIFIED);
    processor.process(&mut out_of_scope).unwrap();
    assert_eq!(first_stacktrace(&out_of_scope), MINIFIED);
}

#[test]
fn test_lazy_strategy() {
    let config = ProcessorConfig {
        load_strategy: LoadStrategyKind::Lazy,
        lazy_base_path: Some(testdata("maps")),
        ..ProcessorConfig::default()
    };
    let mut processor = StackTraceProcessor::new(config);
    processor.start().unwrap();

    let mut batch = batch("webjs", "exception", MINIFIED);
    processor.process(&mut batch).unwrap();
    assert_eq!(first_stacktrace(&batch), RESOLVED);
}

#[test]
fn test_lazy_without_base_path_fails_to_start() {
    let config = ProcessorConfig {
        load_strategy: LoadStrategyKind::Lazy,
        ..ProcessorConfig::default()
    };
    let mut processor = StackTraceProcessor::new(config);
    assert!(processor.start().is_err());
}

#[test]
fn test_concurrent_batches() {
    let processor = started_processor();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut batch = batch("webjs", "exception", MINIFIED);
                    processor.process(&mut batch).unwrap();
                    first_stacktrace(&batch).to_string()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), RESOLVED);
        }
    });
}
