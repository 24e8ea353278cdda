//! Login credentials and the JSON file they are loaded from

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// On-disk shape of the auth file
#[derive(Debug, Deserialize)]
struct AuthFile {
    username: Option<String>,
    password: Option<String>,
}

/// Username and password for the WordPress login form
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Load credentials from a JSON file with `username` and `password`.
    ///
    /// Returns `Ok(None)` when either field is absent or empty, meaning the
    /// probe runs anonymously. A missing or unreadable file is
    /// [`Error::AuthRequired`]; a file that is not a JSON object is a
    /// configuration error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let content = std::fs::read_to_string(&resolved).map_err(|e| {
            tracing::debug!("Cannot read auth file {:?}: {}", resolved, e);
            Error::AuthRequired {
                path: resolved.clone(),
            }
        })?;

        let file: AuthFile = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to load auth file {}: {}",
                resolved.display(),
                e
            ))
        })?;

        match (file.username, file.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Some(Self::new(username, password)))
            }
            _ => {
                tracing::debug!(
                    "Auth file {:?} lacks username or password, running anonymously",
                    resolved
                );
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn auth_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_complete_credentials() {
        let file = auth_file(r#"{"username": "admin", "password": "s3cret"}"#);
        let credentials = Credentials::load(file.path()).unwrap().unwrap();
        assert_eq!(credentials.username(), "admin");
        assert_eq!(credentials.password(), "s3cret");
    }

    #[test]
    fn test_missing_field_means_anonymous() {
        let file = auth_file(r#"{"username": "admin"}"#);
        assert!(Credentials::load(file.path()).unwrap().is_none());

        let file = auth_file(r#"{"username": "", "password": "x"}"#);
        assert!(Credentials::load(file.path()).unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_auth_required() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.json");

        let err = Credentials::load(&path).unwrap_err();
        match err {
            Error::AuthRequired { path: reported } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let file = auth_file("username=admin");
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Failed to load auth file"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("admin", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
