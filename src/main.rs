//! Command-line probe for WordPress AJAX actions
//!
//! Logs in (optionally), picks up a nonce from the admin page and calls a
//! single `admin-ajax.php` action, reporting status, timing and payload.
//!
//! # Usage
//!
//! ```bash
//! wp-ajax-probe --url https://site.local --action my_ajax_action
//! wp-ajax-probe --url https://site.local --action my_ajax_action --data '{"key":"value"}'
//! wp-ajax-probe --url https://site.local --action my_ajax_action --auth temp/auth.json
//! ```

use clap::Parser;
use std::path::PathBuf;

use wp_ajax_probe::cli::{OutputFormat, ProbeArgs, run_probe_mode};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "wp-ajax-probe")]
struct Cli {
    /// WordPress site URL
    #[arg(short, long, value_name = "URL")]
    url: String,

    /// AJAX action name
    #[arg(short, long, value_name = "ACTION")]
    action: String,

    /// JSON data payload (an object)
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    data: String,

    /// Auth file path (JSON with username and password)
    #[arg(long, value_name = "FILE")]
    auth: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Use the admin AJAX endpoint (default)
    #[arg(long, conflicts_with = "nopriv")]
    admin: bool,

    /// Use the nopriv AJAX endpoint
    #[arg(long)]
    nopriv: bool,

    /// HTTP method
    #[arg(short, long, value_name = "METHOD", default_value = "POST")]
    method: String,

    /// Request timeout in ms
    #[arg(short, long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl From<Cli> for ProbeArgs {
    fn from(cli: Cli) -> Self {
        Self {
            url: cli.url,
            action: cli.action,
            data: cli.data,
            auth: cli.auth,
            format: cli.format,
            nopriv: cli.nopriv && !cli.admin,
            method: cli.method,
            timeout_ms: cli.timeout,
            verbose: cli.verbose,
            config: cli.config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let code = run_probe_mode(cli.into()).await;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wp-ajax-probe", "-u", "https://site.local", "-a", "heartbeat"]);
        let args = ProbeArgs::from(cli);

        assert_eq!(args.data, "{}");
        assert_eq!(args.method, "POST");
        assert_eq!(args.format, OutputFormat::Human);
        assert_eq!(args.timeout_ms, None);
        assert!(!args.nopriv);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let result = Cli::try_parse_from([
            "wp-ajax-probe",
            "-u",
            "https://site.local",
            "-a",
            "x",
            "--timeout",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_admin_conflicts_with_nopriv() {
        let result = Cli::try_parse_from([
            "wp-ajax-probe",
            "-u",
            "https://site.local",
            "-a",
            "x",
            "--admin",
            "--nopriv",
        ]);
        assert!(result.is_err());
    }
}
