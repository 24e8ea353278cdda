//! WP AJAX Probe
//!
//! A command-line probe for WordPress `admin-ajax.php` actions. It can log in
//! through the regular login form, pick up a nonce from the admin screens,
//! and then call one AJAX action, reporting status, timing and payload.
//!
//! # Architecture
//!
//! A run goes through three steps, each feeding the next:
//! - **Login**: form POST to `wp-login.php`; session cookies are kept in a
//!   [`session::SessionStore`]
//! - **Nonce extraction**: the admin page is scanned with an ordered list of
//!   strategies, first match wins
//! - **Dispatch**: the action, caller fields and nonce are sent with the
//!   session cookies; every HTTP status is a normal result
//!
//! # Usage
//!
//! ```bash
//! wp-ajax-probe --url https://site.local --action heartbeat --format json
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use wp_ajax_probe::{SessionManager, Settings, types::ProbeRequest};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut manager = SessionManager::new(Settings::default())?;
//! let request = ProbeRequest::new("https://site.local", "heartbeat")?;
//! let response = manager.probe(&request).await?;
//! assert!(response.success);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, ErrorCode, Result};
pub use session::SessionManager;
pub use types::{AjaxPayload, ErrorResponse, ProbeRequest, ProbeResponse};
