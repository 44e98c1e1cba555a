//! Generated-to-original position resolution.

use crate::parser::{StackFrame, StackTrace};
use crate::source_map::{MappingLookup, SourceMapRepository};
use log::trace;

/// Resolve one frame against the repository
///
/// **Public** - never fails; returns the frame resolved or untouched
///
/// Opaque frames, frames whose map is missing and frames with no covering
/// segment come back unchanged.
pub fn resolve_frame(mut frame: StackFrame, repository: &SourceMapRepository) -> StackFrame {
    let Some(location) = &frame.location else {
        return frame;
    };

    let key = location.source_map_key();
    let Some(map) = repository.get(&key) else {
        trace!("No source map for {}", key);
        return frame;
    };

    // Browsers report 1-based lines; a line 0 can never match
    let Some(line) = location.line.checked_sub(1) else {
        return frame;
    };

    match map.lookup(line, location.column) {
        MappingLookup::Found(position) => {
            frame.resolved = Some(position);
        }
        MappingLookup::NotFound => {
            trace!(
                "No mapping in {} for {}:{}",
                key,
                location.line,
                location.column
            );
        }
    }

    frame
}

/// Resolve every frame of a stack trace, keeping frame order
pub fn resolve_stack_trace(trace: StackTrace, repository: &SourceMapRepository) -> StackTrace {
    StackTrace {
        frames: trace
            .frames
            .into_iter()
            .map(|frame| resolve_frame(frame, repository))
            .collect(),
    }
}
