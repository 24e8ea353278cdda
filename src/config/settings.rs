//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the probe.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration settings for the probe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Outgoing request configuration
    pub request: RequestSettings,
    /// WordPress endpoint layout
    pub endpoints: EndpointSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum redirect hops followed per call
    pub max_redirects: usize,
    /// User-Agent header value
    pub user_agent: String,
}

/// Paths of the WordPress endpoints, relative to the site URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Login form handler
    pub login_path: String,
    /// Authenticated page scanned for a nonce
    pub admin_path: String,
    /// AJAX dispatcher
    pub ajax_path: String,
    /// AJAX dispatcher used for `nopriv` actions
    pub nopriv_ajax_path: String,
    /// Body marker that flags a rejected login
    pub failure_marker: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_redirects: 5,
            user_agent: format!("wp-ajax-probe/{}", crate::utils::VERSION),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            login_path: "/wp-login.php".to_string(),
            admin_path: "/wp-admin/".to_string(),
            ajax_path: "/wp-admin/admin-ajax.php".to_string(),
            nopriv_ajax_path: "/wp-admin/admin-ajax.php".to_string(),
            failure_marker: "login_error".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            verbose: false,
        }
    }
}

impl RequestSettings {
    /// Timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EndpointSettings {
    /// Dispatcher path for an admin or a `nopriv` action
    pub fn ajax_path_for(&self, nopriv: bool) -> &str {
        if nopriv {
            &self.nopriv_ajax_path
        } else {
            &self.ajax_path
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            crate::Error::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(self) -> crate::Result<Self> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn merge_with<F>(mut self, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(timeout) = lookup("WP_AJAX_TIMEOUT_MS") {
            self.request.timeout_ms = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        if let Some(max) = lookup("WP_AJAX_MAX_REDIRECTS") {
            self.request.max_redirects = max
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid redirect limit: {}", e)))?;
        }

        if let Some(user_agent) = lookup("WP_AJAX_USER_AGENT") {
            self.request.user_agent = user_agent;
        }

        if let Some(level) = lookup("WP_AJAX_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Reject settings that cannot produce a working probe
    pub fn validate(&self) -> crate::Result<()> {
        if self.request.timeout_ms == 0 {
            return Err(crate::Error::config("Timeout must be greater than zero"));
        }

        let paths = [
            ("login_path", &self.endpoints.login_path),
            ("admin_path", &self.endpoints.admin_path),
            ("ajax_path", &self.endpoints.ajax_path),
            ("nopriv_ajax_path", &self.endpoints.nopriv_ajax_path),
        ];
        for (name, path) in paths {
            if !path.starts_with('/') {
                return Err(crate::Error::Config(format!(
                    "{} must start with '/': {:?}",
                    name, path
                )));
            }
        }

        if self.endpoints.failure_marker.is_empty() {
            return Err(crate::Error::config("failure_marker must not be empty"));
        }

        Ok(())
    }
}
