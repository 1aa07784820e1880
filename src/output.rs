//! Terminal and JSON presentation of matcher results.

use colored::Colorize;
use serde_json::{json, Value};

use crate::parser::ParsedError;
use crate::terminal::TerminalOutput;

/// Stack trace lines wider than this are cut with an ellipsis
const MAX_STACK_LINE_WIDTH: usize = 160;

/// Print a recognised error with its location and (optionally) stack trace
pub fn print_colored(error: &ParsedError, show_stack_trace: bool) {
    let width = textwrap::termwidth().min(100);

    println!();
    let header = format!("{}: {}", error.error_type, error.message);
    for (i, line) in textwrap::wrap(&header, width.saturating_sub(2)).iter().enumerate() {
        if i == 0 {
            println!("{} {}", "●".red(), line.bold());
        } else {
            println!("  {}", line.bold());
        }
    }
    println!();

    println!(
        "  {} {}",
        "Language:".blue().bold(),
        error.language.to_string().bright_white()
    );
    match &error.file_path {
        Some(file) => println!(
            "  {} {}",
            "Location:".blue().bold(),
            format_file_line(file, error.line_number, error.column_number)
        ),
        None => println!("  {} {}", "Location:".blue().bold(), "unknown".dimmed()),
    }
    println!();

    if show_stack_trace {
        println!("{} {}", "▸".cyan(), "Stack Trace".cyan().bold());
        for (i, line) in error.stack_trace.lines().enumerate() {
            let line = truncate_line(line, MAX_STACK_LINE_WIDTH);
            if i == 0 {
                println!("  {}", line.red());
            } else {
                println!("  {}", line.dimmed());
            }
        }
        println!();
    }
}

/// Report that nothing was recognised
pub fn print_no_error(text: &str) {
    println!();
    println!("{} {}", "✓".green(), "No recognizable error".green().bold());
    println!();
    if contains_error_patterns(text) {
        println!(
            "  {}",
            "The output mentions an error, but not in a format errscan recognizes.".dimmed()
        );
        println!();
    }
}

/// Describe a captured command's non-zero exit
pub fn print_exit_status(command: &str, code: i32) {
    println!(
        "  {} {} exited with {} ({})",
        "Command:".yellow().bold(),
        command.bright_white(),
        code.to_string().yellow(),
        interpret_exit_code(code)
    );
    println!();
}

/// JSON document for `--json`: the record (or null) plus capture details
pub fn json_payload(error: Option<&ParsedError>, input: &TerminalOutput) -> Value {
    let mut payload = json!({
        "detected": error.is_some(),
        "error": error,
    });
    if let Some(command) = &input.command {
        payload["command"] = json!(command);
    }
    if let Some(code) = input.exit_code {
        payload["exitCode"] = json!(code);
    }
    payload
}

pub fn print_debug_section(title: &str, body: &str, footer: Option<String>) {
    eprintln!("{}", format!("=== DEBUG: {title} ===").yellow().bold());
    if body.trim().is_empty() {
        eprintln!("{}", "| <empty>".dimmed());
    } else {
        for line in body.lines() {
            eprintln!("{}", format!("| {line}").bright_white());
        }
    }
    if let Some(footer) = footer {
        eprintln!("{}", footer.dimmed());
    }
    eprintln!();
}

/// Format a file:line:col location with color highlighting for terminal output
pub fn format_file_line(file: &str, line: Option<u32>, column: Option<u32>) -> String {
    let mut result = file.cyan().to_string();
    if let Some(l) = line {
        result.push_str(&format!(":{}", l.to_string().yellow()));
        if let Some(c) = column {
            result.push_str(&format!(":{}", c.to_string().yellow()));
        }
    }
    result
}

fn truncate_line(line: &str, max_chars: usize) -> String {
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let kept: String = line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Check if a string contains common error words
pub fn contains_error_patterns(text: &str) -> bool {
    let error_patterns = [
        "error",
        "Error",
        "ERROR",
        "exception",
        "Exception",
        "EXCEPTION",
        "failed",
        "Failed",
        "FAILED",
        "panic",
        "Panic",
        "PANIC",
        "traceback",
        "Traceback",
        "segmentation fault",
        "Segmentation fault",
        "SIGSEGV",
        "SIGABRT",
    ];

    error_patterns.iter().any(|pattern| text.contains(pattern))
}

/// Interpret exit codes with human-readable descriptions
pub fn interpret_exit_code(code: i32) -> &'static str {
    match code {
        0 => "Success",
        1 => "General error",
        2 => "Misuse of shell command",
        126 => "Command cannot execute (permission denied)",
        127 => "Command not found",
        128 => "Invalid exit argument",
        130 => "Terminated by Ctrl+C (SIGINT)",
        137 => "Killed (SIGKILL)",
        139 => "Segmentation fault (SIGSEGV)",
        141 => "Broken pipe (SIGPIPE)",
        143 => "Terminated (SIGTERM)",
        _ if code > 128 && code < 165 => "Signal received",
        _ => "Unknown error",
    }
}
