//! Output for rewritten stack traces and trace batches.
//!
//! This module handles:
//! - Rendering frames back to stack trace text
//! - Reading and writing OTLP JSON trace batches

pub mod json;
pub mod rewriter;

// Re-export main functions
pub use json::{batch_to_string, read_batch, validate_output_path, write_batch};
pub use rewriter::{render_frame, render_stack_trace};
