use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::process::ExitCode;
use tracing::info;

use errscan::output::{
    json_payload, print_colored, print_debug_section, print_exit_status, print_no_error,
};
use errscan::{config, logging, terminal, CaptureError, Cli, Config, ErrorParser};

/// Exit status when no terminal output could be obtained
const EXIT_NO_INPUT: u8 = 2;

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "errscan", &mut io::stdout());
}

fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    if cli.print_config {
        config::print_default_config();
        return Ok(());
    }

    let mut config = Config::load();
    config.apply_env_overrides();
    cli.apply_to(&mut config);

    let source = cli.source();
    let input = terminal::read_output(&source, &config.capture.sanitize_options())?;

    if cli.debug {
        print_debug_section(
            "Input",
            &input.text,
            Some(format!(
                "({} chars, {} lines)",
                input.text.len(),
                input.text.lines().count()
            )),
        );
    }

    let parser = ErrorParser::new();
    let parsed = parser.parse(&input.text);

    match &parsed {
        Some(error) => info!("{}", error.summary()),
        None => info!("no recognizable error"),
    }

    if config.output.json {
        let payload = json_payload(parsed.as_ref(), &input);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to serialize result")?
        );
        return Ok(());
    }

    match &parsed {
        Some(error) => print_colored(error, config.output.show_stack_trace),
        None => print_no_error(&input.text),
    }

    if let (Some(command), Some(code)) = (&input.command, input.exit_code) {
        if input.command_failed() {
            print_exit_status(command, code);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            match err.downcast_ref::<CaptureError>() {
                Some(CaptureError::NoInput) => {
                    eprintln!(
                        "{} {}",
                        "Tip:".blue().bold(),
                        "Use 2>&1 to capture stderr: command 2>&1 | errscan".dimmed()
                    );
                    ExitCode::from(EXIT_NO_INPUT)
                }
                Some(_) => ExitCode::from(EXIT_NO_INPUT),
                None => ExitCode::FAILURE,
            }
        }
    }
}
