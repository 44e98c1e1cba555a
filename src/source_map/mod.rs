//! Source map loading, caching and lookup.
//!
//! This module handles:
//! - Decoding Source Map v3 documents
//! - Nearest-preceding-segment position lookup
//! - Eager (directory scan) and lazy (first use) map caching

pub mod map;
pub mod repository;

// Re-export main types
pub use map::{MappingLookup, OriginalPosition, SourceMap};
pub use repository::{LoadStrategy, SourceMapRepository};
