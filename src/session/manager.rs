//! # Probe Session Manager
//!
//! The [`SessionManager`] owns one cookie store and one transport and runs a
//! probe from start to finish:
//!
//! 1. Log in whenever credentials are supplied (a rejected login aborts the run)
//! 2. Extract a nonce from the admin page, when logged in (never fatal)
//! 3. Dispatch the AJAX action with the session cookies and nonce
//!
//! Each manager carries its own [`SessionStore`], so independent runs never
//! share cookies.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use wp_ajax_probe::{SessionManager, Settings, types::ProbeRequest};
//!
//! # async fn example() -> wp_ajax_probe::Result<()> {
//! let mut manager = SessionManager::new(Settings::default())?;
//! let request = ProbeRequest::new("https://site.local", "heartbeat")?;
//!
//! let response = manager.probe(&request).await?;
//! println!("HTTP {} in {}ms", response.status_code, response.response_time_ms);
//! # Ok(())
//! # }
//! ```

use crate::{
    Result,
    config::Settings,
    session::{
        Authenticator, Credentials, HttpTransport, NonceExtractor, RequestOptions,
        ReqwestTransport, SessionStore, TransportResponse, endpoint_url,
        network::FORM_CONTENT_TYPE,
    },
    types::{AjaxPayload, ProbeRequest, ProbeResponse},
};
use reqwest::{Method, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Convenience type alias for SessionManager with the reqwest transport
pub type SessionManager = SessionManagerGeneric<ReqwestTransport>;

/// Runs login, nonce extraction and dispatch against one site
#[derive(Debug)]
pub struct SessionManagerGeneric<T: HttpTransport = ReqwestTransport> {
    /// Configuration settings
    settings: Arc<Settings>,
    /// Network seam
    transport: T,
    /// Cookies collected during this run
    store: SessionStore,
}

impl SessionManagerGeneric<ReqwestTransport> {
    /// Creates a new session manager with the given configuration.
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(&settings.request)?;
        Ok(Self::with_transport(settings, transport))
    }
}

impl<T: HttpTransport> SessionManagerGeneric<T> {
    /// Creates a session manager over a custom transport
    pub fn with_transport(settings: Settings, transport: T) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            store: SessionStore::new(),
        }
    }

    /// Cookies collected so far
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the whole probe described by `request`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::AuthFailed`] when a login is attempted and rejected
    /// - transport errors from the final dispatch
    ///
    /// Nonce extraction problems are never reported as errors.
    pub async fn probe(&mut self, request: &ProbeRequest) -> Result<ProbeResponse> {
        let started = Instant::now();
        let timeout = request
            .timeout
            .unwrap_or_else(|| self.settings.request.timeout());

        let authenticated = match &request.credentials {
            Some(credentials) => {
                self.login(&request.base_url, credentials, timeout).await?;
                true
            }
            None => {
                debug!("No credentials, dispatching anonymously");
                false
            }
        };

        let nonce = if authenticated {
            self.extract_nonce(&request.base_url, timeout).await
        } else {
            None
        };
        if let Some(nonce) = &nonce {
            debug!(
                "Extracted nonce: {}...",
                nonce.chars().take(10).collect::<String>()
            );
        }

        let payload = AjaxPayload::new(&request.action)
            .with_fields(request.data.clone())
            .with_nonce(nonce);
        let endpoint = endpoint_url(
            &request.base_url,
            self.settings.endpoints.ajax_path_for(request.nopriv),
        );

        let response = self
            .dispatch(&endpoint, &payload, request.method.clone(), timeout)
            .await?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            "Action {} answered HTTP {} in {}ms",
            request.action, response.status, elapsed_ms
        );

        Ok(ProbeResponse::new(
            &request.action,
            endpoint,
            &response,
            elapsed_ms,
        ))
    }

    /// Log in and keep the session cookies
    pub async fn login(
        &mut self,
        base_url: &str,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<()> {
        Authenticator::new(&self.transport, &self.settings.endpoints, timeout)
            .login(base_url, credentials, &mut self.store)
            .await
    }

    /// Look for a nonce on the admin page using the current cookies
    pub async fn extract_nonce(&mut self, base_url: &str, timeout: Duration) -> Option<String> {
        NonceExtractor::new(&self.transport, &self.settings.endpoints, timeout)
            .extract(base_url, &mut self.store)
            .await
    }

    /// Send `payload` to `endpoint`.
    ///
    /// POST carries the fields as a form body, other methods as a query
    /// string. Any HTTP status is returned as a normal response.
    pub async fn dispatch(
        &mut self,
        endpoint: &str,
        payload: &AjaxPayload,
        method: Method,
        timeout: Duration,
    ) -> Result<TransportResponse> {
        let options = RequestOptions::get(timeout)
            .with_method(method)
            .with_header(header::CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
            .with_header("x-requested-with", "XMLHttpRequest")
            .with_params(payload.to_pairs());

        let response = self
            .transport
            .execute(endpoint, options, &self.store)
            .await?;
        self.store.record(&response);

        Ok(response)
    }
}
