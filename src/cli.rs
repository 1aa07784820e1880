//! Command-line interface definitions for the `errscan` tool.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Config;
use crate::terminal::TerminalSource;

/// Detect program errors in captured terminal output
#[derive(Parser, Debug)]
#[command(
    name = "errscan",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ERRSCAN_GIT_SHA"), ")"),
    about,
    long_about = None
)]
#[command(
    after_help = "EXAMPLES:\n    errscan \"TypeError: x is not a function\"\n    npm test 2>&1 | errscan\n    errscan --file build.log --json\n    errscan --capture -- cargo build"
)]
pub struct Cli {
    /// Terminal output to scan (with --capture: the command to run)
    #[arg(trailing_var_arg = true)]
    pub input: Vec<String>,

    /// Read terminal output from a file
    #[arg(long, short = 'f', value_name = "PATH", conflicts_with = "capture")]
    pub file: Option<PathBuf>,

    /// Run a command and scan its stderr
    #[arg(long)]
    pub capture: bool,

    /// Also scan stdout in capture mode (default: stderr only)
    #[arg(long, requires = "capture")]
    pub capture_all: bool,

    /// Output as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Show debug info (sanitized input and matcher decisions)
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Don't print the stack trace under the error
    #[arg(long)]
    pub no_stack: bool,

    /// Keep only the last N lines of input
    #[arg(long, value_name = "N")]
    pub max_lines: Option<usize>,

    /// Don't strip ANSI escape sequences from input
    #[arg(long)]
    pub no_strip: bool,

    /// Output default configuration to stdout
    #[arg(long)]
    pub print_config: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Where the terminal output should be read from
    pub fn source(&self) -> TerminalSource {
        if self.capture {
            TerminalSource::Command {
                argv: self.input.clone(),
                include_stdout: self.capture_all,
            }
        } else if let Some(path) = &self.file {
            TerminalSource::File(path.clone())
        } else if !self.input.is_empty() {
            TerminalSource::Text(self.input.join(" "))
        } else {
            TerminalSource::Stdin
        }
    }

    /// Flags take precedence over the config file and environment
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(max_lines) = self.max_lines {
            config.capture.max_lines = max_lines;
        }
        if self.no_strip {
            config.capture.strip_ansi = false;
        }
        if self.no_stack {
            config.output.show_stack_trace = false;
        }
        if self.json {
            config.output.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parses_input_args() {
        let cli = Cli::parse_from(["errscan", "TypeError:", "boom"]);
        assert_eq!(cli.input, vec!["TypeError:", "boom"]);
        assert_eq!(cli.source(), TerminalSource::Text("TypeError: boom".to_string()));
    }

    #[test]
    fn test_cli_without_input_reads_stdin() {
        let cli = Cli::parse_from(["errscan"]);
        assert_eq!(cli.source(), TerminalSource::Stdin);
    }

    #[test]
    fn test_cli_multiline_quoted_arg() {
        let cli = Cli::parse_from(["errscan", "Traceback\nKeyError: 'x'"]);
        assert_eq!(cli.input.len(), 1);
        assert!(cli.input[0].contains('\n'));
    }

    #[test]
    fn test_cli_parses_file() {
        let cli = Cli::parse_from(["errscan", "--file", "build.log"]);
        assert_eq!(cli.source(), TerminalSource::File(PathBuf::from("build.log")));
    }

    #[test]
    fn test_cli_parses_capture_command() {
        let cli = Cli::parse_from(["errscan", "--capture", "--", "cargo", "build", "--release"]);
        assert_eq!(
            cli.source(),
            TerminalSource::Command {
                argv: vec!["cargo".into(), "build".into(), "--release".into()],
                include_stdout: false,
            }
        );
    }

    #[test]
    fn test_cli_capture_all() {
        let cli = Cli::parse_from(["errscan", "--capture", "--capture-all", "--", "make"]);
        assert!(matches!(
            cli.source(),
            TerminalSource::Command {
                include_stdout: true,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_capture_all_requires_capture() {
        assert!(Cli::try_parse_from(["errscan", "--capture-all", "x"]).is_err());
    }

    #[test]
    fn test_cli_file_conflicts_with_capture() {
        let args = ["errscan", "--capture", "--file", "a.log", "--", "make"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parses_json_flags() {
        assert!(Cli::parse_from(["errscan", "--json", "x"]).json);
        assert!(Cli::parse_from(["errscan", "-j", "x"]).json);
    }

    #[test]
    fn test_cli_parses_debug_flag() {
        assert!(Cli::parse_from(["errscan", "-d", "x"]).debug);
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::parse_from(["errscan", "--completions", "bash"]);
        assert_eq!(cli.completions, Some(Shell::Bash));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "errscan",
            "--max-lines",
            "20",
            "--no-strip",
            "--no-stack",
            "--json",
            "x",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.capture.max_lines, 20);
        assert!(!config.capture.strip_ansi);
        assert!(!config.output.show_stack_trace);
        assert!(config.output.json);
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let cli = Cli::parse_from(["errscan", "x"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config, Config::default());
    }
}
