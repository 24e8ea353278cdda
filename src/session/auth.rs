//! WordPress form login
//!
//! Submits the `wp-login.php` form and records the session cookies the site
//! hands back. A login counts as successful only when the final response is
//! a 200 whose body does not carry the failure marker.

use crate::{
    Error, Result,
    config::EndpointSettings,
    session::{Credentials, HttpTransport, RequestOptions, SessionStore, endpoint_url},
};
use std::time::Duration;
use tracing::{debug, info};

/// Performs the form login against a site
#[derive(Debug)]
pub struct Authenticator<'a, T: HttpTransport + ?Sized> {
    transport: &'a T,
    endpoints: &'a EndpointSettings,
    timeout: Duration,
}

impl<'a, T: HttpTransport + ?Sized> Authenticator<'a, T> {
    pub fn new(transport: &'a T, endpoints: &'a EndpointSettings, timeout: Duration) -> Self {
        Self {
            transport,
            endpoints,
            timeout,
        }
    }

    /// Log in and record the resulting cookies in `store`.
    ///
    /// Cookies are recorded whatever the outcome. Any non-200 status, a body
    /// containing the failure marker, or a transport failure yields
    /// [`Error::AuthFailed`]. There is no retry.
    pub async fn login(
        &self,
        base_url: &str,
        credentials: &Credentials,
        store: &mut SessionStore,
    ) -> Result<()> {
        let login_url = endpoint_url(base_url, &self.endpoints.login_path);
        let form = login_form(base_url, credentials, self.endpoints);

        debug!(
            "Submitting login for {:?} to {}",
            credentials.username(),
            login_url
        );

        let response = self
            .transport
            .execute(&login_url, RequestOptions::post_form(form, self.timeout), store)
            .await
            .map_err(|e| Error::AuthFailed(e.to_string()))?;

        store.record(&response);

        if !response.is_ok() {
            return Err(Error::AuthFailed(format!(
                "login returned HTTP {}",
                response.status
            )));
        }

        if response.body.contains(&self.endpoints.failure_marker) {
            return Err(Error::AuthFailed(
                "login rejected by the site, check username and password".to_string(),
            ));
        }

        info!(
            "Logged in as {:?} ({} cookies)",
            credentials.username(),
            store.len()
        );
        Ok(())
    }
}

/// Form fields posted to the login handler, in wire order
pub fn login_form(
    base_url: &str,
    credentials: &Credentials,
    endpoints: &EndpointSettings,
) -> Vec<(String, String)> {
    vec![
        ("log".to_string(), credentials.username().to_string()),
        ("pwd".to_string(), credentials.password().to_string()),
        ("wp-submit".to_string(), "Log In".to_string()),
        (
            "redirect_to".to_string(),
            endpoint_url(base_url, &endpoints.admin_path),
        ),
        ("testcookie".to_string(), "1".to_string()),
    ]
}
