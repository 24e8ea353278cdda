//! Error type definitions
//!
//! Defines the main error type used throughout the probe and the
//! classification that turns an error into a user-facing code with
//! remediation hints.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the probe
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or input errors (bad JSON payload, bad URL, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials file missing or unreadable
    #[error("Auth file not found: {}", path.display())]
    AuthRequired { path: PathBuf },

    /// Login was submitted but rejected, or could not complete
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// DNS failure or refused connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// A network call exceeded its time bound
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Redirect chain longer than the configured bound
    #[error("Too many redirects (limit {max})")]
    TooManyRedirects { max: usize },

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Classified error code reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthRequired,
    AuthFailed,
    ConnectionError,
    Timeout,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthFailed => "AUTH_FAILED",
            Self::ConnectionError => "CONNECTION_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new authentication failure
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthFailed(msg.into())
    }

    /// Create a new connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map a reqwest failure onto the transport taxonomy.
    ///
    /// Timeouts and connect failures get their own variants so that they
    /// can be classified; anything else stays a generic network error.
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else if err.is_connect() {
            Self::Connection(error_chain(&err))
        } else {
            Self::Network(err)
        }
    }

    /// Classified code for user-facing reports
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AuthRequired { .. } => ErrorCode::AuthRequired,
            Self::AuthFailed(_) => ErrorCode::AuthFailed,
            Self::Connection(_) | Self::TooManyRedirects { .. } => ErrorCode::ConnectionError,
            Self::Timeout { .. } => ErrorCode::Timeout,
            _ => ErrorCode::UnknownError,
        }
    }

    /// Actionable remediation hints for this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AuthRequired { path } => vec![
                format!("Create {} with username and password", path.display()),
                "Use --auth flag to specify auth file location".to_string(),
            ],
            Self::AuthFailed(_) => vec![
                "Check username and password in auth file".to_string(),
                "Verify WordPress site URL is correct".to_string(),
            ],
            Self::Connection(_) => vec![
                "Check if WordPress site is running".to_string(),
                "Verify site URL is correct".to_string(),
            ],
            Self::TooManyRedirects { .. } => vec![
                "Check the site for a redirect loop".to_string(),
                "Verify site URL is correct".to_string(),
            ],
            Self::Timeout { .. } => vec![
                "Increase timeout with --timeout flag".to_string(),
                "Check server performance".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

/// Render an error together with its source chain on one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test config error");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.code(), ErrorCode::UnknownError);
    }

    #[test]
    fn test_auth_required_mentions_path() {
        let err = Error::AuthRequired {
            path: PathBuf::from("temp/auth.json"),
        };
        assert!(err.to_string().contains("temp/auth.json"));
        assert_eq!(err.code(), ErrorCode::AuthRequired);

        let suggestions = err.suggestions();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("temp/auth.json"));
    }

    #[rstest]
    #[case(Error::auth_failed("bad password"), ErrorCode::AuthFailed)]
    #[case(Error::connection("refused"), ErrorCode::ConnectionError)]
    #[case(Error::TooManyRedirects { max: 5 }, ErrorCode::ConnectionError)]
    #[case(Error::Timeout { timeout_ms: 10 }, ErrorCode::Timeout)]
    #[case(Error::config("bad data"), ErrorCode::UnknownError)]
    #[case(Error::internal("boom"), ErrorCode::UnknownError)]
    fn test_error_classification(#[case] err: Error, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }

    #[test]
    fn test_unknown_errors_have_no_suggestions() {
        assert!(Error::config("bad data").suggestions().is_empty());
    }

    #[test]
    fn test_timeout_suggests_flag() {
        let err = Error::Timeout { timeout_ms: 1500 };
        assert_eq!(err.to_string(), "Request timeout after 1500ms");
        assert!(err.suggestions().iter().any(|s| s.contains("--timeout")));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ConnectionError).unwrap();
        assert_eq!(json, "\"CONNECTION_ERROR\"");
        assert_eq!(ErrorCode::UnknownError.to_string(), "UNKNOWN_ERROR");
    }
}
