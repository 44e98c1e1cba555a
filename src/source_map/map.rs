//! Decoded source map and position lookup.
//!
//! Wraps the `sourcemap` crate's decoded Source Map v3 document and exposes
//! the single lookup the resolver needs: nearest preceding segment on the
//! same generated line.

use crate::utils::error::SourceMapError;
use log::trace;
use std::path::Path;

/// An original source position found in a source map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Original source file, as listed in the map's `sources`
    pub source: String,

    /// Original line (1-based)
    pub line: u32,

    /// Original column, as stored in the mapping (0-based)
    pub column: u32,

    /// Symbol name from the map's `names`, if the segment carries one
    pub name: Option<String>,
}

/// Result of looking up a generated position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingLookup {
    Found(OriginalPosition),
    NotFound,
}

impl MappingLookup {
    pub fn found(self) -> Option<OriginalPosition> {
        match self {
            MappingLookup::Found(position) => Some(position),
            MappingLookup::NotFound => None,
        }
    }
}

/// A decoded, immutable source map
#[derive(Debug)]
pub struct SourceMap {
    inner: sourcemap::SourceMap,
}

impl SourceMap {
    /// Decode a Source Map v3 JSON document
    ///
    /// # Errors
    /// * `SourceMapError::DecodeFailed` - invalid JSON, malformed mappings,
    ///   or an index map (not supported)
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SourceMapError> {
        let inner = sourcemap::SourceMap::from_slice(bytes)?;
        Ok(Self { inner })
    }

    /// Read and decode a source map file
    ///
    /// # Errors
    /// * `SourceMapError::ReadFailed` - the file could not be read
    /// * `SourceMapError::DecodeFailed` - the contents are not a valid source map
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceMapError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SourceMapError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    /// The generated file this map describes, if declared
    pub fn file(&self) -> Option<&str> {
        self.inner.get_file()
    }

    /// Number of decoded mapping segments
    pub fn segment_count(&self) -> u32 {
        self.inner.get_token_count()
    }

    /// Look up a generated position (both 0-based)
    ///
    /// Picks the segment on `line` with the greatest generated column that is
    /// `<= column`. Segments on earlier lines never match, and a segment
    /// without an original source is treated as not found.
    pub fn lookup(&self, line: u32, column: u32) -> MappingLookup {
        let Some(token) = self.inner.lookup_token(line, column) else {
            return MappingLookup::NotFound;
        };

        if token.get_dst_line() != line || token.get_dst_col() > column {
            trace!(
                "No segment covers {}:{} (nearest is {}:{})",
                line,
                column,
                token.get_dst_line(),
                token.get_dst_col()
            );
            return MappingLookup::NotFound;
        }

        let Some(source) = token.get_source() else {
            return MappingLookup::NotFound;
        };

        MappingLookup::Found(OriginalPosition {
            source: source.to_string(),
            line: token.get_src_line().saturating_add(1),
            column: token.get_src_col(),
            name: token.get_name().map(str::to_string),
        })
    }
}
