//! Webjs Stacktrace
//!
//! Rewrites minified/bundled web JS exception stack traces into their
//! original source positions using Source Map v3 files.
//!
//! A line such as
//!
//! ```text
//! padStart@http://localhost:4203/lineSlicer.min.js:1:228
//! ```
//!
//! becomes `padStart@lib/lineSlicer.js:11:53` when `lineSlicer.min.js.map`
//! maps that position. Lines that do not parse, or whose map or mapping is
//! missing, are passed through unchanged.
//!
//! ## Getting Started
//!
//! ```ignore
//! use webjs_stacktrace::resolver::StackTraceResolver;
//! use webjs_stacktrace::source_map::SourceMapRepository;
//!
//! let repository = SourceMapRepository::eager();
//! repository.load_all(&["dist/maps"])?;
//! let resolver = StackTraceResolver::new(repository);
//! println!("{}", resolver.rewrite_text(stack_trace));
//! ```

pub mod commands;
pub mod output;
pub mod parser;
pub mod processor;
pub mod resolver;
pub mod source_map;
pub mod telemetry;
pub mod utils;
