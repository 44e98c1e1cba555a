//! Stack trace text rendering.
//!
//! Reassembles frames into text using the same `label@file:line:column`
//! convention and the same line breaks as the input.

use crate::parser::{StackFrame, StackTrace};
use crate::utils::config::{FRAME_SEPARATOR, POSITION_SEPARATOR};

/// Render a stack trace back to text
///
/// **Public** - main entry point for rendering
///
/// Frames without a resolved position are emitted exactly as they were read,
/// so a trace where nothing resolved renders identical to its input.
pub fn render_stack_trace(trace: &StackTrace) -> String {
    let capacity = trace.frames.iter().map(|f| f.raw.len() + 2).sum();
    let mut out = String::with_capacity(capacity);

    for frame in &trace.frames {
        render_frame_into(frame, &mut out);
        out.push_str(frame.line_break.as_str());
    }

    out
}

/// Render one frame without its line break
pub fn render_frame(frame: &StackFrame) -> String {
    let mut out = String::new();
    render_frame_into(frame, &mut out);
    out
}

fn render_frame_into(frame: &StackFrame, out: &mut String) {
    match (&frame.location, &frame.resolved) {
        (Some(location), Some(position)) => {
            out.push_str(&location.call_label);
            out.push(FRAME_SEPARATOR);
            out.push_str(&position.source);
            out.push(POSITION_SEPARATOR);
            out.push_str(&position.line.to_string());
            out.push(POSITION_SEPARATOR);
            out.push_str(&position.column.to_string());
        }
        _ => out.push_str(&frame.raw),
    }
}
