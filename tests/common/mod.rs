//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use std::path::{Path, PathBuf};
    use wp_ajax_probe::{
        config::Settings,
        session::SessionManager,
    };
    use wiremock::Request;

    /// Create a session manager with default settings
    pub fn create_test_session_manager() -> SessionManager {
        SessionManager::new(Settings::default()).expect("transport builds")
    }

    /// Create settings with a custom timeout and redirect limit
    pub fn create_test_settings(timeout_ms: u64, max_redirects: usize) -> Settings {
        let mut settings = Settings::default();
        settings.request.timeout_ms = timeout_ms;
        settings.request.max_redirects = max_redirects;
        settings
    }

    /// Write an auth file into `dir`
    pub fn write_auth_file(dir: &Path, username: &str, password: &str) -> PathBuf {
        let path = dir.join("auth.json");
        let content = serde_json::json!({ "username": username, "password": password });
        std::fs::write(&path, content.to_string()).expect("auth file written");
        path
    }

    /// Decode a form-urlencoded request body, sorted by key
    pub fn form_pairs(request: &Request) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect();
        pairs.sort();
        pairs
    }

    /// Build an owned pair list from literals
    pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        pairs.sort();
        pairs
    }

    /// An address nothing listens on
    pub fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }
}
