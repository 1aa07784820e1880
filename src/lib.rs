//! errscan - error detection for captured terminal output
//!
//! This library provides the core functionality for the `errscan` CLI tool:
//! recognising JavaScript, TypeScript, Python, Java, C#, Go and Rust errors
//! in raw terminal text and extracting their type, message, location and
//! stack trace.

pub mod cli;
pub mod config;
pub mod location;
pub mod logging;
pub mod output;
pub mod parser;
pub mod sanitize;
pub mod terminal;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Config;
pub use location::SourceLocation;
pub use parser::{parse, ErrorParser, ErrorPattern, Language, ParsedError};
pub use sanitize::{sanitize_output, strip_ansi, SanitizeOptions};
pub use terminal::{CaptureError, TerminalOutput, TerminalSource};
