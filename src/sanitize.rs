//! Cleanup of raw captured terminal text before it reaches the matcher.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ANSI_CSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("Static regex pattern is valid")
});

/// Options applied by [`sanitize_output`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Keep only this many trailing lines (0 keeps everything)
    pub max_lines: usize,
    /// Remove ANSI color/cursor sequences
    pub strip_ansi: bool,
    /// Keep only this many trailing bytes (0 keeps everything)
    pub max_bytes: usize,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            max_lines: 500,
            strip_ansi: true,
            max_bytes: 1024 * 1024,
        }
    }
}

/// Remove ANSI CSI escape sequences. Borrows when there is nothing to strip.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !contains_ansi(text) {
        return Cow::Borrowed(text);
    }
    ANSI_CSI.replace_all(text, "")
}

/// Check if text carries any escape byte
pub fn contains_ansi(text: &str) -> bool {
    text.contains('\x1b')
}

/// Clean captured output: strip escapes, drop carriage returns, keep the
/// tail of the buffer and trim surrounding whitespace.
pub fn sanitize_output(raw: &str, options: &SanitizeOptions) -> String {
    let mut cleaned = if options.strip_ansi {
        strip_ansi(raw).into_owned()
    } else {
        raw.to_string()
    };

    cleaned.retain(|c| c != '\r');

    if options.max_lines > 0 {
        let line_count = cleaned.split('\n').count();
        if line_count > options.max_lines {
            cleaned = cleaned
                .split('\n')
                .skip(line_count - options.max_lines)
                .collect::<Vec<_>>()
                .join("\n");
        }
    }

    if options.max_bytes > 0 && cleaned.len() > options.max_bytes {
        cleaned = tail_at_char_boundary(&cleaned, options.max_bytes).to_string();
    }

    cleaned.trim().to_string()
}

/// Last `max_bytes` bytes of `text`, moved forward to the next char boundary.
fn tail_at_char_boundary(text: &str, max_bytes: usize) -> &str {
    let mut start = text.len().saturating_sub(max_bytes);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
