//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod process;
pub mod resolve;

// Re-export main command functions
pub use models::{ProcessArgs, ResolveArgs, SourceMapArgs};
pub use process::{execute_process, validate_args};
pub use resolve::execute_resolve;
