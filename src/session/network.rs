//! HTTP transport
//!
//! Thin request layer over reqwest. Every HTTP status is returned as a
//! normal [`TransportResponse`]; only transport-level failures (connect,
//! DNS, timeout, redirect overflow) surface as errors.
//!
//! Redirects are followed here rather than by reqwest so that cookies set on
//! intermediate hops (WordPress sets its auth cookies on the 302 after login)
//! are captured and forwarded to the next hop.

use crate::{Error, Result, config::RequestSettings, session::SessionStore};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;

/// Content type used for every probe request
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Options for a single outgoing call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Bound for the whole call, redirects included
    pub timeout: Duration,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Form body for POST, query string otherwise
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    /// Plain GET
    pub fn get(timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            timeout,
            headers: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Form-encoded POST
    pub fn post_form(params: Vec<(String, String)>, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            timeout,
            headers: vec![(
                header::CONTENT_TYPE.as_str().to_string(),
                FORM_CONTENT_TYPE.to_string(),
            )],
            params,
        }
    }

    /// Set the method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the parameters
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Response of a completed call, whatever its status
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    /// Headers of the final response, lower-case names, in wire order
    pub headers: Vec<(String, String)>,
    /// `Set-Cookie` values from every hop, in order
    pub set_cookies: Vec<String>,
    /// Raw body text
    pub body: String,
}

impl TransportResponse {
    /// Create a response with a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            url: String::new(),
            headers: Vec::new(),
            set_cookies: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header to the final response
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    /// Add a `Set-Cookie` value, visible both as a header and to the cookie store
    pub fn with_set_cookie(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.headers
            .push((header::SET_COOKIE.as_str().to_string(), value.clone()));
        self.set_cookies.push(value);
        self
    }

    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Headers grouped by name: a string for single values, an array for
    /// repeated ones
    pub fn header_map(&self) -> BTreeMap<String, serde_json::Value> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in &self.headers {
            grouped.entry(name.clone()).or_default().push(value.clone());
        }

        grouped
            .into_iter()
            .map(|(name, mut values)| {
                let value = if values.len() == 1 {
                    serde_json::Value::String(values.remove(0))
                } else {
                    serde_json::Value::from(values)
                };
                (name, value)
            })
            .collect()
    }

    /// Body as JSON when it parses, otherwise as a plain string
    pub fn body_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Seam between the probe logic and the network
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute one call, attaching `cookies` as the `Cookie` header
    async fn execute(
        &self,
        url: &str,
        options: RequestOptions,
        cookies: &SessionStore,
    ) -> Result<TransportResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_redirects: usize,
}

impl ReqwestTransport {
    /// Build a transport from request settings
    pub fn new(settings: &RequestSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirects: settings.max_redirects,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        url: &str,
        options: RequestOptions,
        cookies: &SessionStore,
    ) -> Result<TransportResponse> {
        let timeout_ms = options.timeout_ms();
        let deadline = Instant::now() + options.timeout;

        // Hop-local copy; the caller decides what to keep via SessionStore::record
        let mut jar = cookies.clone();
        let mut set_cookies = Vec::new();
        let mut method = options.method.clone();
        let mut params = options.params.clone();
        let mut current = Url::parse(url)?;
        let mut hops = 0usize;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout { timeout_ms });
            }

            let mut builder = self
                .client
                .request(method.clone(), current.clone())
                .timeout(remaining);
            for (name, value) in &options.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(cookie) = jar.serialize() {
                builder = builder.header(header::COOKIE, cookie);
            }
            if !params.is_empty() {
                builder = if method == Method::POST {
                    builder.form(&params)
                } else {
                    builder.query(&params)
                };
            }

            tracing::debug!("{} {}", method, current);
            let response = builder
                .send()
                .await
                .map_err(|e| Error::from_transport(e, timeout_ms))?;

            let status = response.status();
            for value in response.headers().get_all(header::SET_COOKIE) {
                if let Ok(value) = value.to_str() {
                    jar.record_header(value);
                    set_cookies.push(value.to_string());
                }
            }

            if is_followed_redirect(status)
                && let Some(location) = response.headers().get(header::LOCATION)
            {
                if hops >= self.max_redirects {
                    return Err(Error::TooManyRedirects {
                        max: self.max_redirects,
                    });
                }
                hops += 1;

                let location = location
                    .to_str()
                    .map_err(|e| Error::Internal(format!("Invalid redirect location: {}", e)))?;
                current = current.join(location)?;

                if status == StatusCode::TEMPORARY_REDIRECT
                    || status == StatusCode::PERMANENT_REDIRECT
                {
                    if method != Method::POST {
                        params.clear();
                    }
                } else {
                    if method != Method::HEAD {
                        method = Method::GET;
                    }
                    params.clear();
                }

                tracing::debug!("Following {} redirect to {}", status.as_u16(), current);
                continue;
            }

            let final_url = response.url().to_string();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .text()
                .await
                .map_err(|e| Error::from_transport(e, timeout_ms))?;

            return Ok(TransportResponse {
                status: status.as_u16(),
                url: final_url,
                headers,
                set_cookies,
                body,
            });
        }
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}
