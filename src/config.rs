//! Configuration system for `errscan`.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::sanitize::SanitizeOptions;

/// How captured terminal output is cleaned before matching
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Trailing lines kept from captured output (0 keeps everything)
    pub max_lines: usize,
    /// Strip ANSI escape sequences
    pub strip_ansi: bool,
    /// Trailing bytes kept from captured output (0 keeps everything)
    pub max_input_bytes: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let defaults = SanitizeOptions::default();
        Self {
            max_lines: defaults.max_lines,
            strip_ansi: defaults.strip_ansi,
            max_input_bytes: defaults.max_bytes,
        }
    }
}

impl CaptureConfig {
    pub fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            max_lines: self.max_lines,
            strip_ansi: self.strip_ansi,
            max_bytes: self.max_input_bytes,
        }
    }
}

/// Report presentation
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the stack trace slice under the error
    pub show_stack_trace: bool,
    /// Emit JSON instead of colored text
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_stack_trace: true,
            json: false,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load config from file, returning default config if file doesn't exist
    pub fn load() -> Self {
        Self::load_from_path(Self::config_path())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), "ignoring malformed config: {err}");
                Self::default()
            }
        }
    }

    /// Get the config file path (~/.config/errscan/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("errscan").join("config.toml"))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in practice)
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // ERRSCAN_MAX_LINES=<n> sets the capture tail window
        if let Some(value) = lookup("ERRSCAN_MAX_LINES") {
            match value.trim().parse::<usize>() {
                Ok(max_lines) => self.capture.max_lines = max_lines,
                Err(_) => warn!("ignoring invalid ERRSCAN_MAX_LINES={value}"),
            }
        }

        if lookup("ERRSCAN_JSON").is_some_and(|v| v == "1") {
            self.output.json = true;
        }

        if lookup("ERRSCAN_NO_STACK").is_some_and(|v| v == "1") {
            self.output.show_stack_trace = false;
        }
    }
}

/// Generate default config as TOML string
pub fn generate_default_config() -> String {
    r#"# errscan configuration
# Place this file at ~/.config/errscan/config.toml

[capture]
# Keep only the last N lines of captured output (0 = keep everything)
max_lines = 500

# Remove ANSI color and cursor escape sequences before matching
strip_ansi = true

# Keep only the last N bytes of captured output (0 = keep everything)
max_input_bytes = 1048576

[output]
# Show the stack trace under the detected error
show_stack_trace = true

# Emit JSON instead of colored text
json = false

# Environment variable overrides:
# ERRSCAN_MAX_LINES=<n> - Override capture.max_lines
# ERRSCAN_JSON=1        - Force JSON output
# ERRSCAN_NO_STACK=1    - Hide the stack trace
# ERRSCAN_LOG=<filter>  - Log filter (e.g. "debug"), falls back to RUST_LOG
"#
    .to_string()
}

/// Print the default config to stdout
pub fn print_default_config() {
    print!("{}", generate_default_config());
}
