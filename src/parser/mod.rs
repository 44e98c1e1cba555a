//! Stack trace parsing.
//!
//! This module handles:
//! - Splitting stack trace text into lines, keeping line breaks
//! - Recognising `label@.../basename:line:column` frames
//! - Keeping every other line as an opaque passthrough frame

pub mod frame;

// Re-export main types
pub use frame::{
    parse_frame_line, parse_stack_trace, GeneratedLocation, LineBreak, StackFrame, StackTrace,
};
