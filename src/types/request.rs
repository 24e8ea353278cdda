//! Request type definitions
//!
//! Defines what a probe run needs to know and the AJAX payload it sends.

use crate::{Error, Result, session::Credentials};
use reqwest::Method;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

/// Reserved field carrying the nonce
pub const NONCE_FIELD: &str = "_ajax_nonce";

/// Everything needed to run one probe
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Site base URL, without a trailing slash
    pub base_url: String,
    /// AJAX action name
    pub action: String,
    /// Extra fields sent with the action
    pub data: Map<String, Value>,
    /// Login credentials; `None` runs anonymously
    pub credentials: Option<Credentials>,
    /// HTTP method for the AJAX call
    pub method: Method,
    /// Per-call timeout; `None` uses the configured default
    pub timeout: Option<Duration>,
    /// Skip login and nonce even when credentials are present
    pub nopriv: bool,
}

impl ProbeRequest {
    /// Create a request for `action` on the site at `base_url`.
    ///
    /// The URL must be an absolute http(s) URL.
    pub fn new(base_url: &str, action: impl Into<String>) -> Result<Self> {
        let action = action.into();
        if action.trim().is_empty() {
            return Err(Error::config("Action name must not be empty"));
        }

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            action,
            data: Map::new(),
            credentials: None,
            method: Method::POST,
            timeout: None,
            nopriv: false,
        })
    }

    /// Set the data fields
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Set the data fields from a JSON object literal
    pub fn with_data_json(self, json: &str) -> Result<Self> {
        Ok(self.with_data(parse_data(json)?))
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the HTTP method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the nopriv flag
    pub fn with_nopriv(mut self, nopriv: bool) -> Self {
        self.nopriv = nopriv;
        self
    }
}

/// Parse the `--data` payload, which must be a JSON object
pub fn parse_data(json: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::Config(format!(
            "Invalid JSON data: expected an object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(Error::Config(format!("Invalid JSON data: {}", e))),
    }
}

/// Parse an HTTP method name, case-insensitively
pub fn parse_method(name: &str) -> Result<Method> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::Config(format!("Invalid HTTP method: {:?}", name)))
}

/// Validate a site URL and strip trailing slashes
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid site URL {:?}: {}", base_url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(Error::Config(format!(
            "Site URL must be http(s) with a host: {:?}",
            base_url
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The AJAX call body: action, caller fields and optional nonce
#[derive(Debug, Clone, PartialEq)]
pub struct AjaxPayload {
    action: String,
    fields: Map<String, Value>,
    nonce: Option<String>,
}

impl AjaxPayload {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: Map::new(),
            nonce: None,
        }
    }

    /// Set all caller fields
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields = fields;
        self
    }

    /// Add one caller field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Set or clear the nonce
    pub fn with_nonce(mut self, nonce: Option<String>) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// Flatten into key/value pairs: `action` first, then the fields, then
    /// the nonce. A later key replaces an earlier one in place.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("action".to_string(), self.action.clone())];

        for (key, value) in &self.fields {
            upsert(&mut pairs, key, form_value(value));
        }

        if let Some(nonce) = &self.nonce {
            upsert(&mut pairs, NONCE_FIELD, nonce.clone());
        }

        pairs
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    match pairs.iter_mut().find(|(existing, _)| existing == key) {
        Some(entry) => entry.1 = value,
        None => pairs.push((key.to_string(), value)),
    }
}

/// Text form of a JSON value inside a form body
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
