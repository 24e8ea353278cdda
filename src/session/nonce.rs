//! Nonce extraction from the authenticated admin page
//!
//! The page is parsed once and handed to an ordered list of strategies.
//! The first strategy that yields a value wins. Failing to find a nonce is a
//! normal outcome: many AJAX actions do not check one.

use crate::{
    config::EndpointSettings,
    session::{HttpTransport, RequestOptions, SessionStore, endpoint_url},
};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// A pure lookup over a parsed document
pub type NonceStrategy = fn(&Html) -> Option<String>;

/// Strategies in priority order
pub const DEFAULT_STRATEGIES: &[(&str, NonceStrategy)] = &[
    ("wpnonce_input", wpnonce_input),
    ("ajax_nonce_input", ajax_nonce_input),
    ("inline_script", inline_script_nonce),
];

/// `nonce: "…"` style assignments inside script text. The key is matched
/// case-insensitively; the value must be lowercase hex.
static SCRIPT_NONCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i:nonce)["']?\s*:\s*["']([a-f0-9]+)["']"#).expect("valid nonce regex")
});

/// Fetches the admin page and runs the strategies over it
#[derive(Debug)]
pub struct NonceExtractor<'a, T: HttpTransport + ?Sized> {
    transport: &'a T,
    endpoints: &'a EndpointSettings,
    timeout: Duration,
    strategies: &'a [(&'a str, NonceStrategy)],
}

impl<'a, T: HttpTransport + ?Sized> NonceExtractor<'a, T> {
    pub fn new(transport: &'a T, endpoints: &'a EndpointSettings, timeout: Duration) -> Self {
        Self {
            transport,
            endpoints,
            timeout,
            strategies: DEFAULT_STRATEGIES,
        }
    }

    /// Replace the strategy list
    pub fn with_strategies(mut self, strategies: &'a [(&'a str, NonceStrategy)]) -> Self {
        self.strategies = strategies;
        self
    }

    /// Fetch the admin page with the session cookies and look for a nonce.
    ///
    /// Cookies set by the admin page are kept in `store`. Never fails: fetch
    /// errors and pages without a nonce both give `None`. Nothing is cached,
    /// every call refetches the page.
    pub async fn extract(&self, base_url: &str, store: &mut SessionStore) -> Option<String> {
        let admin_url = endpoint_url(base_url, &self.endpoints.admin_path);

        let response = match self
            .transport
            .execute(&admin_url, RequestOptions::get(self.timeout), store)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Nonce page fetch failed, continuing without nonce: {}", e);
                return None;
            }
        };
        store.record(&response);

        let nonce = find_nonce(&response.body, self.strategies);
        if nonce.is_none() {
            debug!(
                "No nonce found on {} (HTTP {})",
                admin_url, response.status
            );
        }
        nonce
    }
}

/// Run `strategies` over `html` in order, first match wins
pub fn find_nonce(html: &str, strategies: &[(&str, NonceStrategy)]) -> Option<String> {
    let document = Html::parse_document(html);
    strategies.iter().find_map(|(name, strategy)| {
        let found = strategy(&document);
        if found.is_some() {
            debug!("Nonce found by strategy {}", name);
        }
        found
    })
}

/// Value of `<input name="_wpnonce">`
pub fn wpnonce_input(document: &Html) -> Option<String> {
    input_value(document, "_wpnonce")
}

/// Value of `<input name="_ajax_nonce">`
pub fn ajax_nonce_input(document: &Html) -> Option<String> {
    input_value(document, "_ajax_nonce")
}

/// First `nonce: "hex"` assignment found in an inline script
pub fn inline_script_nonce(document: &Html) -> Option<String> {
    let selector = Selector::parse("script").ok()?;
    document
        .select(&selector)
        .map(|script| script.text().collect::<String>())
        .filter(|text| text.to_ascii_lowercase().contains("nonce"))
        .find_map(|text| {
            SCRIPT_NONCE_RE
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
}

fn input_value(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"input[name="{}"]"#, name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
