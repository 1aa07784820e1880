//! Stack-trace slicing and source-location lookup.
//!
//! Every recognised error carries a bounded slice of the input starting at
//! the line where the error was found. Languages that do not report their
//! position on the error line itself get a secondary search here, either
//! over that slice (JavaScript, Java) or over the whole input (Python, Rust).

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Maximum number of lines kept in a stack trace slice
pub const MAX_STACK_LINES: usize = 20;

// NOTE: static patterns, checked by the tests below.
static JS_CALL_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    // at fn (file:line:col)
    Regex::new(r"(?R)at .+ \((.+):(\d+):(\d+)\)").expect("Static regex pattern is valid")
});

static JS_BARE_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    // at file:line:col
    Regex::new(r"(?R)at (.+):(\d+):(\d+)").expect("Static regex pattern is valid")
});

static PYTHON_FILE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?R)File "(.+)", line (\d+)"#).expect("Static regex pattern is valid")
});

static JAVA_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?R)at .+\((.+\.java):(\d+)\)").expect("Static regex pattern is valid")
});

static RUST_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?R)-->\s+(.+):(\d+):(\d+)").expect("Static regex pattern is valid")
});

/// A source position referenced by an error. Any part may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl SourceLocation {
    /// Create an empty location
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the 1-based line, ignoring values that are not positive
    pub fn with_line(mut self, line: &str) -> Self {
        self.line = parse_position(line);
        self
    }

    /// Set the 1-based column, ignoring values that are not positive
    pub fn with_column(mut self, column: &str) -> Self {
        self.column = parse_position(column);
        self
    }

    /// Build a location from `(file, line[, column])` capture groups starting at `first`.
    pub(crate) fn from_captures(caps: &Captures<'_>, first: usize) -> Self {
        let mut location = Self::new();
        if let Some(file) = caps.get(first) {
            location = location.with_file(file.as_str());
        }
        if let Some(line) = caps.get(first + 1) {
            location = location.with_line(line.as_str());
        }
        if let Some(column) = caps.get(first + 2) {
            location = location.with_column(column.as_str());
        }
        location
    }
}

/// Parse a 1-based source position. Zero and overflowing values are dropped.
pub fn parse_position(digits: &str) -> Option<u32> {
    digits.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

/// Take the line containing byte `offset` plus up to 19 following lines.
///
/// Lines are split on `\n` only, so a trailing `\r` stays with its line.
pub fn extract_stack_trace(text: &str, offset: usize) -> String {
    let offset = offset.min(text.len());
    let start_line = text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();

    text.split('\n')
        .skip(start_line)
        .take(MAX_STACK_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Node-style frames: `at fn (file:line:col)`, falling back to `at file:line:col`.
pub fn javascript_location(stack_trace: &str) -> SourceLocation {
    JS_CALL_FRAME
        .captures(stack_trace)
        .or_else(|| JS_BARE_FRAME.captures(stack_trace))
        .map(|caps| SourceLocation::from_captures(&caps, 1))
        .unwrap_or_default()
}

/// First `File "path", line N` anywhere in the input. Python never reports a column.
pub fn python_location(full_text: &str) -> SourceLocation {
    PYTHON_FILE_LINE
        .captures(full_text)
        .map(|caps| SourceLocation::from_captures(&caps, 1))
        .unwrap_or_default()
}

/// First `at pkg.Class.method(File.java:N)` frame in the slice.
pub fn java_location(stack_trace: &str) -> SourceLocation {
    JAVA_FRAME
        .captures(stack_trace)
        .map(|caps| SourceLocation::from_captures(&caps, 1))
        .unwrap_or_default()
}

/// rustc's `--> path:line:col` pointer, searched over the whole input.
pub fn rust_location(full_text: &str) -> SourceLocation {
    RUST_ARROW
        .captures(full_text)
        .map(|caps| SourceLocation::from_captures(&caps, 1))
        .unwrap_or_default()
}
