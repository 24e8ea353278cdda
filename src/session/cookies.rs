//! Session cookie store
//!
//! Accumulates `Set-Cookie` values from responses and renders them back as a
//! single `Cookie` request header. Names are unique and the most recent value
//! wins; the header keeps the order in which names were first seen.

use crate::session::network::TransportResponse;

/// Cookies collected during one probe run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    cookies: Vec<(String, String)>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every `Set-Cookie` value carried by a response, including
    /// those set on intermediate redirect hops
    pub fn record(&mut self, response: &TransportResponse) {
        for value in &response.set_cookies {
            self.record_header(value);
        }
    }

    /// Record a single `Set-Cookie` header value.
    ///
    /// Attributes after the first `;` (path, expiry, flags) are ignored.
    /// Values without a name are skipped.
    pub fn record_header(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            tracing::debug!("Ignoring malformed Set-Cookie value: {:?}", set_cookie);
            return;
        };

        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let value = value.trim().to_string();
        match self.cookies.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value,
            None => self.cookies.push((name.to_string(), value)),
        }
    }

    /// Render the store as a `Cookie` header value, `None` when empty
    pub fn serialize(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Look up a cookie value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
