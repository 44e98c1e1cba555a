//! Stack trace text parser.
//!
//! Splits raw stack trace text into frames. Each line is either a parsed
//! frame of the form `label@.../basename:line:column` or an opaque line kept
//! verbatim. Every frame remembers the exact line break that ended it so the
//! text can be reassembled byte for byte.

use crate::source_map::OriginalPosition;
use crate::utils::config::{
    FRAME_SEPARATOR, PATH_SEPARATOR, POSITION_SEPARATOR, SOURCE_MAP_EXTENSION,
};

/// Line terminator that followed a frame in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// Last line, no terminator
    None,
    Lf,
    CrLf,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::None => "",
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// Position in the minified bundle, parsed from a frame line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLocation {
    /// Text before the first `@` (function name, may be empty)
    pub call_label: String,

    /// Bundle filename without its path (e.g. `app.min.js`)
    pub source_basename: String,

    /// Line in the bundle as reported by the browser (1-based)
    pub line: u32,

    /// Column in the bundle as reported by the browser
    pub column: u32,
}

impl GeneratedLocation {
    /// Repository key of the map for this bundle (`app.min.js` -> `app.min.js.map`)
    pub fn source_map_key(&self) -> String {
        format!("{}{}", self.source_basename, SOURCE_MAP_EXTENSION)
    }
}

/// One line of a stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Line text without its terminator, always retained
    pub raw: String,

    pub line_break: LineBreak,

    /// Present only if the line matched the frame shape
    pub location: Option<GeneratedLocation>,

    /// Filled by the resolver when a mapping was found
    pub resolved: Option<OriginalPosition>,
}

impl StackFrame {
    pub fn is_opaque(&self) -> bool {
        self.location.is_none()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Ordered frames of one stack trace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    pub frames: Vec<StackFrame>,
}

impl StackTrace {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_resolved()).count()
    }

    /// Frames that parsed but did not resolve
    pub fn unresolved_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| !f.is_opaque() && !f.is_resolved())
            .count()
    }
}

/// Parse raw stack trace text into frames
///
/// **Public** - main entry point for parsing
///
/// Never fails: lines that do not look like `label@.../file:line:column`
/// become opaque frames.
pub fn parse_stack_trace(text: &str) -> StackTrace {
    let frames = text
        .split_inclusive('\n')
        .map(|chunk| {
            let (raw, line_break) = split_line_break(chunk);
            StackFrame {
                raw: raw.to_string(),
                line_break,
                location: parse_frame_line(raw),
                resolved: None,
            }
        })
        .collect();

    StackTrace { frames }
}

/// Separate a line from its terminator
///
/// **Private** - internal helper for parse_stack_trace
fn split_line_break(chunk: &str) -> (&str, LineBreak) {
    if let Some(line) = chunk.strip_suffix("\r\n") {
        (line, LineBreak::CrLf)
    } else if let Some(line) = chunk.strip_suffix('\n') {
        (line, LineBreak::Lf)
    } else {
        (chunk, LineBreak::None)
    }
}

/// Parse one line into a generated location
///
/// **Public** - exposed for single-line use and tests
///
/// Returns `None` for opaque lines.
pub fn parse_frame_line(line: &str) -> Option<GeneratedLocation> {
    let (call_label, location) = line.split_once(FRAME_SEPARATOR)?;

    let unit = location
        .rsplit(PATH_SEPARATOR)
        .next()
        .unwrap_or(location);

    let mut tokens = unit.split(POSITION_SEPARATOR);
    let (Some(basename), Some(line_token), Some(column_token), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return None;
    };

    if basename.is_empty() {
        return None;
    }

    Some(GeneratedLocation {
        call_label: call_label.to_string(),
        source_basename: basename.to_string(),
        line: parse_decimal(line_token)?,
        column: parse_decimal(column_token)?,
    })
}

/// Parse a non-empty run of ASCII digits
///
/// **Private** - rejects signs and whitespace that `str::parse` would accept
fn parse_decimal(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
