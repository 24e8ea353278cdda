//! Probe mode CLI logic
//!
//! Turns parsed arguments into a [`ProbeRequest`], runs it and reports the
//! outcome. Input problems (bad JSON, bad URL, missing auth file) are caught
//! here before any network call.

use crate::{
    Result, SessionManager,
    cli::output::{self, OutputFormat},
    config::{ConfigLoader, Settings},
    session::Credentials,
    types::{ErrorResponse, ProbeRequest, ProbeResponse, request},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Arguments for probe mode
#[derive(Debug, Clone)]
pub struct ProbeArgs {
    pub url: String,
    pub action: String,
    pub data: String,
    pub auth: Option<PathBuf>,
    pub format: OutputFormat,
    pub nopriv: bool,
    pub method: String,
    pub timeout_ms: Option<u64>,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

impl ProbeArgs {
    pub fn new(url: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            action: action.into(),
            data: "{}".to_string(),
            auth: None,
            format: OutputFormat::Human,
            nopriv: false,
            method: "POST".to_string(),
            timeout_ms: None,
            verbose: false,
            config: None,
        }
    }
}

/// Run probe mode and return the process exit code
pub async fn run_probe_mode(args: ProbeArgs) -> i32 {
    let loaded = ConfigLoader::new().load(args.config.as_deref());
    init_logging(log_filter(args.verbose, loaded.as_ref().ok()));

    let result = match loaded {
        Ok(settings) => execute(&args, settings).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            output::print_success(&response, args.format);
            0
        }
        Err(e) => {
            tracing::debug!("Probe failed: {:?}", e);
            output::print_error(&ErrorResponse::from_error(&e), args.format);
            1
        }
    }
}

/// Validate inputs, then run the probe
pub async fn execute(args: &ProbeArgs, mut settings: Settings) -> Result<ProbeResponse> {
    if let Some(timeout_ms) = args.timeout_ms {
        settings.request.timeout_ms = timeout_ms;
    }
    settings.validate()?;

    let request = build_probe_request(args, &settings)?;

    let mut manager = SessionManager::new(settings)?;
    manager.probe(&request).await
}

/// Build the probe request from CLI arguments.
///
/// The data payload is checked first, then the URL and method, and the
/// credentials file last.
pub fn build_probe_request(args: &ProbeArgs, settings: &Settings) -> Result<ProbeRequest> {
    let data = request::parse_data(&args.data)?;
    let method = request::parse_method(&args.method)?;

    let credentials = match &args.auth {
        Some(path) => {
            let credentials = Credentials::load(path)?;
            tracing::debug!("Loaded auth from: {}", path.display());
            credentials
        }
        None => None,
    };

    Ok(ProbeRequest::new(&args.url, &args.action)?
        .with_data(data)
        .with_method(method)
        .with_credentials(credentials)
        .with_timeout(Duration::from_millis(settings.request.timeout_ms))
        .with_nopriv(args.nopriv))
}

fn log_filter(verbose: bool, settings: Option<&Settings>) -> String {
    match settings {
        _ if verbose => "debug".to_string(),
        Some(settings) if settings.logging.verbose => "debug".to_string(),
        Some(settings) => settings.logging.level.clone(),
        None => "warn".to_string(),
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_logging(default_filter: String) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
