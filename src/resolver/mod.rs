//! Position resolution and the stack trace engine.
//!
//! This module handles:
//! - Resolving parsed frames to original positions
//! - Running parse -> resolve -> render over a whole stack trace

pub mod engine;
pub mod position;

// Re-export main types and functions
pub use engine::{Rewrite, StackTraceResolver};
pub use position::{resolve_frame, resolve_stack_trace};
