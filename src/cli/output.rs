//! Output formatting for probe results and errors

use crate::types::{ErrorResponse, ProbeResponse};
use clap::ValueEnum;
use colored::Colorize;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Readable summary
    #[default]
    Human,
    /// Pretty-printed JSON record
    Json,
}

/// Print a successful probe to stdout
pub fn print_success(response: &ProbeResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(response) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        },
        OutputFormat::Human => print!("{}", render_human_success(response)),
    }
}

/// Print an error report to stderr
pub fn print_error(report: &ErrorResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => eprintln!("Failed to serialize error: {}", e),
        },
        OutputFormat::Human => eprint!("{}", render_human_error(report)),
    }
}

/// Human-readable success summary
pub fn render_human_success(response: &ProbeResponse) -> String {
    let verdict = if response.status_code == 200 {
        "OK".green()
    } else {
        "ERROR".red()
    };
    let body = serde_json::to_string_pretty(&response.response)
        .unwrap_or_else(|_| response.response.to_string());

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{} AJAX Test: {}\n", "✓".green(), response.action));
    out.push_str(&format!("  URL: {}\n", response.url));
    out.push_str(&format!("  Status: {} {}\n", response.status_code, verdict));
    out.push_str(&format!(
        "  Response Time: {}ms\n",
        response.response_time_ms
    ));
    out.push('\n');
    out.push_str("  Response:\n");
    out.push_str(&indent(&body, "  "));
    out.push_str("\n\n");
    out
}

/// Human-readable error report
pub fn render_human_error(report: &ErrorResponse) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{} Error: {}\n", "✗".red(), report.error.message));
    if !report.suggestions.is_empty() {
        out.push('\n');
        out.push_str("  Suggestions:\n");
        for suggestion in &report.suggestions {
            out.push_str(&format!("  - {}\n", suggestion));
        }
    }
    out.push('\n');
    out
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
