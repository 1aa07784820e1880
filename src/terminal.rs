//! Terminal output provider.
//!
//! Produces the single text blob handed to the matcher, from command-line
//! text, piped stdin, a log file, or a child command run on the user's behalf.
//! Whatever the source, the text is passed through [`sanitize_output`].

use serde::Serialize;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tracing::debug;

use crate::sanitize::{sanitize_output, SanitizeOptions};

/// Error types for reading terminal output
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No input provided. Usage: errscan <terminal output>, or use --file / --capture")]
    NoInput,

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("No command given to --capture")]
    EmptyCommand,

    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Where terminal output comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalSource {
    /// Text given directly (e.g. command-line arguments)
    Text(String),
    /// Piped standard input
    Stdin,
    /// A log or capture file
    File(PathBuf),
    /// A command to run; stderr is captured, plus stdout when `include_stdout`
    Command {
        argv: Vec<String>,
        include_stdout: bool,
    },
}

/// Sanitised text plus what is known about where it came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalOutput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl TerminalOutput {
    /// Wrap already-available text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when the text came from a captured command that exited non-zero
    pub fn command_failed(&self) -> bool {
        self.exit_code.is_some_and(|code| code != 0)
    }
}

/// Read and sanitise terminal output from `source`
pub fn read_output(
    source: &TerminalSource,
    options: &SanitizeOptions,
) -> Result<TerminalOutput, CaptureError> {
    let mut output = match source {
        TerminalSource::Text(text) => TerminalOutput::from_text(text.clone()),
        TerminalSource::Stdin => TerminalOutput::from_text(read_stdin()?),
        TerminalSource::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| CaptureError::ReadFile {
                path: path.clone(),
                source,
            })?;
            TerminalOutput::from_text(decode_bytes(&bytes))
        }
        TerminalSource::Command {
            argv,
            include_stdout,
        } => capture_command(argv, *include_stdout)?,
    };

    let raw_len = output.text.len();
    output.text = sanitize_output(&output.text, options);
    debug!(
        raw_bytes = raw_len,
        clean_bytes = output.text.len(),
        "read terminal output"
    );

    Ok(output)
}

/// Decode captured bytes as UTF-8, dropping a BOM and replacing invalid sequences
pub fn decode_bytes(bytes: &[u8]) -> String {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        debug!("replaced invalid UTF-8 in captured output");
    }
    text.into_owned()
}

fn read_stdin() -> Result<String, CaptureError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CaptureError::NoInput);
    }

    let mut bytes = Vec::new();
    stdin
        .lock()
        .read_to_end(&mut bytes)
        .map_err(CaptureError::Stdin)?;
    Ok(decode_bytes(&bytes))
}

/// Run `argv` to completion and collect its output
pub fn capture_command(
    argv: &[String],
    include_stdout: bool,
) -> Result<TerminalOutput, CaptureError> {
    let (program, args) = argv.split_first().ok_or(CaptureError::EmptyCommand)?;
    let command_line = argv.join(" ");

    debug!(command = %command_line, "capturing command output");
    let result = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| CaptureError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    let stderr = decode_bytes(&result.stderr);
    let text = if include_stdout {
        let stdout = decode_bytes(&result.stdout);
        if stdout.is_empty() || stderr.is_empty() {
            stdout + &stderr
        } else {
            format!("{stdout}\n{stderr}")
        }
    } else {
        stderr
    };

    Ok(TerminalOutput {
        text,
        command: Some(command_line),
        exit_code: exit_code(result.status),
    })
}

/// Exit code, mapping death-by-signal to the shell's 128+N convention
fn exit_code(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(128 + signal);
        }
    }
    status.code()
}
