//! Error detection for captured terminal output across multiple languages.
//!
//! The matcher holds an ordered list of per-language rules and runs them
//! against the input. The first rule whose pattern matches and whose
//! extractor accepts the match wins:
//!
//! 1. TypeScript compiler diagnostics (`file.ts(l,c): error TS1234: ...`)
//! 2. C# compiler diagnostics (`file.cs(l,c): error CS1234: ...`)
//! 3. Go compiler diagnostics (`file.go:l:c: ...`)
//! 4. Rust compiler diagnostics (`error[E0123]: ...` with a `-->` pointer)
//! 5. Java exceptions (`pkg.SomeException: ...`)
//! 6. Python tracebacks (`NameError: ...` with `Traceback`/`File "` markers)
//! 7. JavaScript runtime errors (`TypeError: ...` without those markers)

use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::location::{self, SourceLocation};
use crate::sanitize::strip_ansi;

// ============================================================================
// Core Types
// ============================================================================

/// Languages the matcher can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    #[serde(rename = "C#")]
    CSharp,
    Go,
    Rust,
}

impl Language {
    /// Display name, as used in reports and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognised error, extracted from terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedError {
    /// Error identifier, e.g. "TypeError", "TS2339", "java.lang.NullPointerException"
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error description, verbatim from the input
    pub message: String,
    /// Up to 20 lines of input starting at the error line
    pub stack_trace: String,
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
    pub language: Language,
    /// The complete original input
    pub raw_output: String,
}

impl ParsedError {
    /// Create a record with no known location
    pub fn new(
        language: Language,
        error_type: impl Into<String>,
        message: impl Into<String>,
        stack_trace: impl Into<String>,
        raw_output: impl Into<String>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            stack_trace: stack_trace.into(),
            file_path: None,
            line_number: None,
            column_number: None,
            language,
            raw_output: raw_output.into(),
        }
    }

    /// Attach a source location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.file_path = location.file;
        self.line_number = location.line;
        self.column_number = location.column;
        self
    }

    /// `file[:line[:col]]`, when a file is known
    pub fn location(&self) -> Option<String> {
        let file = self.file_path.as_ref()?;
        Some(match (self.line_number, self.column_number) {
            (Some(line), Some(col)) => format!("{file}:{line}:{col}"),
            (Some(line), None) => format!("{file}:{line}"),
            _ => file.clone(),
        })
    }

    /// One-line summary for status lines and logs
    pub fn summary(&self) -> String {
        let mut summary = format!("{}: {} ({})", self.error_type, self.message, self.language);
        if let Some(location) = self.location() {
            summary.push_str(" at ");
            summary.push_str(&location);
        }
        summary
    }
}

// ============================================================================
// Patterns
// ============================================================================

// NOTE: static patterns, each exercised by the tests below.
// (?mR): ^/$ match at line boundaries, \r\n counts as one, `.` never crosses a line.
static TYPESCRIPT_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^(.+\.tsx?)\((\d+),(\d+)\): error TS(\d+): (.+)$")
        .expect("Static regex pattern is valid")
});

static CSHARP_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^(.+\.cs)\((\d+),(\d+)\): error CS(\d+): (.+)$")
        .expect("Static regex pattern is valid")
});

static GO_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^(.+\.go):(\d+):(\d+): (.+)$").expect("Static regex pattern is valid")
});

static GO_FOREIGN_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^error (?:TS|CS)\d+:").expect("Static regex pattern is valid")
});

static RUST_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^error(?:\[E\d+\])?: (.+)$").expect("Static regex pattern is valid")
});

static JAVA_EXCEPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)([\w.]+Exception): (.+)$").expect("Static regex pattern is valid")
});

// Shared by Python and JavaScript; the traceback markers tell them apart.
static WORD_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^(\w+Error): (.+)$").expect("Static regex pattern is valid")
});

/// Literal type reported for toolchains without per-error codes
pub const COMPILE_ERROR: &str = "CompileError";

/// One language rule: a recognition pattern plus an extractor that may
/// decline the match so a later rule can claim it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorPattern {
    TypeScript,
    CSharp,
    Go,
    Rust,
    Java,
    Python,
    JavaScript,
}

impl ErrorPattern {
    /// Built-in rules in the order they are tried
    pub const PRIORITY: [ErrorPattern; 7] = [
        ErrorPattern::TypeScript,
        ErrorPattern::CSharp,
        ErrorPattern::Go,
        ErrorPattern::Rust,
        ErrorPattern::Java,
        ErrorPattern::Python,
        ErrorPattern::JavaScript,
    ];

    /// The language this rule reports
    pub fn language(self) -> Language {
        match self {
            ErrorPattern::TypeScript => Language::TypeScript,
            ErrorPattern::CSharp => Language::CSharp,
            ErrorPattern::Go => Language::Go,
            ErrorPattern::Rust => Language::Rust,
            ErrorPattern::Java => Language::Java,
            ErrorPattern::Python => Language::Python,
            ErrorPattern::JavaScript => Language::JavaScript,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            ErrorPattern::TypeScript => &TYPESCRIPT_DIAGNOSTIC,
            ErrorPattern::CSharp => &CSHARP_DIAGNOSTIC,
            ErrorPattern::Go => &GO_DIAGNOSTIC,
            ErrorPattern::Rust => &RUST_DIAGNOSTIC,
            ErrorPattern::Java => &JAVA_EXCEPTION,
            ErrorPattern::Python | ErrorPattern::JavaScript => &WORD_ERROR,
        }
    }

    /// Find the first occurrence of this rule's trigger shape
    pub fn recognize<'t>(self, text: &'t str) -> Option<Captures<'t>> {
        self.regex().captures(text)
    }

    /// Turn a recognised match into a record, or decline it.
    ///
    /// `text` is the text that was matched; `raw_output` is what the caller
    /// passed in and is stored untouched.
    pub fn extract(
        self,
        caps: &Captures<'_>,
        text: &str,
        raw_output: &str,
    ) -> Option<ParsedError> {
        let offset = caps.get(0)?.start();
        let stack_trace = location::extract_stack_trace(text, offset);

        match self {
            ErrorPattern::TypeScript => {
                compiler_diagnostic(Language::TypeScript, "TS", caps, stack_trace, raw_output)
            }
            ErrorPattern::CSharp => {
                compiler_diagnostic(Language::CSharp, "CS", caps, stack_trace, raw_output)
            }
            ErrorPattern::Go => {
                let message = caps.get(4)?.as_str();
                if GO_FOREIGN_CODE.is_match(message) {
                    return None;
                }
                let error =
                    ParsedError::new(Language::Go, COMPILE_ERROR, message, stack_trace, raw_output)
                        .with_location(SourceLocation::from_captures(caps, 1));
                Some(error)
            }
            ErrorPattern::Rust => {
                let message = caps.get(1)?.as_str();
                let error = ParsedError::new(
                    Language::Rust,
                    COMPILE_ERROR,
                    message,
                    stack_trace,
                    raw_output,
                )
                .with_location(location::rust_location(text));
                Some(error)
            }
            ErrorPattern::Java => {
                let error_type = caps.get(1)?.as_str();
                let message = caps.get(2)?.as_str();
                let frame = location::java_location(&stack_trace);
                let error =
                    ParsedError::new(Language::Java, error_type, message, stack_trace, raw_output)
                        .with_location(frame);
                Some(error)
            }
            ErrorPattern::Python => {
                if !has_traceback_markers(text) {
                    return None;
                }
                let error = ParsedError::new(
                    Language::Python,
                    caps.get(1)?.as_str(),
                    caps.get(2)?.as_str(),
                    stack_trace,
                    raw_output,
                )
                .with_location(location::python_location(text));
                Some(error)
            }
            ErrorPattern::JavaScript => {
                if has_traceback_markers(text) {
                    return None;
                }
                let frame = location::javascript_location(&stack_trace);
                let error = ParsedError::new(
                    Language::JavaScript,
                    caps.get(1)?.as_str(),
                    caps.get(2)?.as_str(),
                    stack_trace,
                    raw_output,
                )
                .with_location(frame);
                Some(error)
            }
        }
    }

    /// Recognise and extract in one step
    pub fn apply(self, text: &str, raw_output: &str) -> Option<ParsedError> {
        let caps = self.recognize(text)?;
        self.extract(&caps, text, raw_output)
    }
}

/// `file(line,col): error XX1234: message`, shared by tsc and csc
fn compiler_diagnostic(
    language: Language,
    code_prefix: &str,
    caps: &Captures<'_>,
    stack_trace: String,
    raw_output: &str,
) -> Option<ParsedError> {
    let error_type = format!("{code_prefix}{}", caps.get(4)?.as_str());
    let message = caps.get(5)?.as_str();
    let error = ParsedError::new(language, error_type, message, stack_trace, raw_output)
        .with_location(SourceLocation::from_captures(caps, 1));
    Some(error)
}

/// Python leaves `Traceback` or `File "..."` lines around its errors
fn has_traceback_markers(text: &str) -> bool {
    text.contains("Traceback") || text.contains("File \"")
}

// ============================================================================
// Matcher
// ============================================================================

static DEFAULT_PARSER: LazyLock<ErrorParser> = LazyLock::new(ErrorParser::new);

/// Ordered rule table; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorParser {
    patterns: Vec<ErrorPattern>,
}

impl ErrorParser {
    /// Create a matcher with all built-in rules in priority order
    pub fn new() -> Self {
        Self::with_patterns(ErrorPattern::PRIORITY)
    }

    /// Create a matcher over a chosen set of rules, tried in the given order
    pub fn with_patterns(patterns: impl IntoIterator<Item = ErrorPattern>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// The rules in the order they are tried
    pub fn patterns(&self) -> &[ErrorPattern] {
        &self.patterns
    }

    /// Find the first recognisable error in `text`.
    ///
    /// Empty and whitespace-only input yields `None` without trying any rule.
    /// ANSI escapes are stripped before matching, so `message` and
    /// `stack_trace` come from the cleaned text while `raw_output` keeps the
    /// input exactly as given.
    pub fn parse(&self, text: &str) -> Option<ParsedError> {
        if text.trim().is_empty() {
            return None;
        }

        let cleaned = strip_ansi(text);

        for pattern in &self.patterns {
            match pattern.apply(&cleaned, text) {
                Some(error) => {
                    debug!(
                        language = %error.language,
                        error_type = %error.error_type,
                        "recognised error"
                    );
                    return Some(error);
                }
                None => trace!(rule = ?pattern, "rule did not apply"),
            }
        }

        debug!(bytes = text.len(), "no recognisable error");
        None
    }

    /// Language of the error `parse` would return
    pub fn detect_language(&self, text: &str) -> Option<Language> {
        self.parse(text).map(|error| error.language)
    }
}

impl Default for ErrorParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with the built-in rule table
pub fn parse(text: &str) -> Option<ParsedError> {
    DEFAULT_PARSER.parse(text)
}

// ============================================================================
// Tests
// ============================================================================
