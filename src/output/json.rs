//! JSON trace batch reader and writer.
//!
//! Reads OTLP JSON trace batches from disk and writes processed batches back
//! with proper formatting.

use crate::telemetry::TraceBatch;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a trace batch to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// processor.process(&mut batch)?;
/// write_batch(&batch, "traces.out.json")?;
/// ```
pub fn write_batch(batch: &TraceBatch, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing trace batch to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, batch).map_err(OutputError::SerializationFailed)?;

    info!(
        "Trace batch written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a trace batch to a pretty-printed string
pub fn batch_to_string(batch: &TraceBatch) -> Result<String, OutputError> {
    serde_json::to_string_pretty(batch).map_err(OutputError::SerializationFailed)
}

/// Validate that output path is writable
///
/// **Public** - shared by commands before any work is done
pub fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a trace batch from a JSON file
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_batch(input_path: impl AsRef<Path>) -> Result<TraceBatch, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading trace batch from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let batch: TraceBatch =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Trace batch loaded: {} resource spans, {} spans",
        batch.resource_spans().len(),
        batch.span_count()
    );

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{Attributes, Resource, ResourceSpans};
    use tempfile::NamedTempFile;

    fn create_test_batch() -> TraceBatch {
        TraceBatch {
            resource_spans: Some(vec![ResourceSpans {
                resource: Some(Resource {
                    attributes: Some(Attributes::new().with_str("telemetry.sdk.language", "webjs")),
                    ..Resource::default()
                }),
                ..ResourceSpans::default()
            }]),
            ..TraceBatch::default()
        }
    }

    #[test]
    fn test_write_and_read_batch() {
        let batch = create_test_batch();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_batch(&batch, path).unwrap();
        let loaded = read_batch(path).unwrap();

        assert_eq!(loaded, batch);
    }

    #[test]
    fn test_batch_to_string() {
        let text = batch_to_string(&create_test_batch()).unwrap();
        assert!(text.contains("resourceSpans"));
        assert!(text.contains("telemetry.sdk.language"));
    }

    #[test]
    fn test_validate_output_path_empty() {
        let result = validate_output_path(Path::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/traces.json");

        write_batch(&create_test_batch(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_invalid_json() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not json").unwrap();

        let result = read_batch(temp_file.path());
        assert!(matches!(result, Err(OutputError::SerializationFailed(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = read_batch(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(OutputError::ReadFailed(_))));
    }
}
