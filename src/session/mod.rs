//! Session handling for a probe run
//!
//! This module holds the stateful part of the probe: the cookie store, the
//! HTTP transport, the form login, nonce extraction from the admin page, and
//! the [`SessionManager`] that drives them in order.

pub mod auth;
pub mod cookies;
pub mod credentials;
pub mod manager;
pub mod network;
pub mod nonce;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::Authenticator;
pub use cookies::SessionStore;
pub use credentials::Credentials;
pub use manager::{SessionManager, SessionManagerGeneric};
pub use network::{HttpTransport, RequestOptions, ReqwestTransport, TransportResponse};
pub use nonce::{DEFAULT_STRATEGIES, NonceExtractor, NonceStrategy};

/// Join a site base URL and an absolute endpoint path
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
