//! Response type definitions
//!
//! Defines the records reported after a probe run, for both outcomes.

use crate::{Error, ErrorCode, session::TransportResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a completed probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    /// Always true for a completed dispatch, whatever the HTTP status
    pub success: bool,

    /// The AJAX action that was called
    pub action: String,

    /// Endpoint the action was sent to
    pub url: String,

    /// HTTP status of the AJAX response
    pub status_code: u16,

    /// Milliseconds from the start of the run to the response
    pub response_time_ms: u64,

    /// Parsed JSON body, or the raw text when it is not JSON
    pub response: serde_json::Value,

    /// Response headers
    pub headers: BTreeMap<String, serde_json::Value>,
}

impl ProbeResponse {
    /// Create a probe response from the AJAX transport response
    pub fn new(
        action: impl Into<String>,
        url: impl Into<String>,
        response: &TransportResponse,
        response_time_ms: u64,
    ) -> Self {
        Self {
            success: true,
            action: action.into(),
            url: url.into(),
            status_code: response.status,
            response_time_ms,
            response: response.body_value(),
            headers: response.header_map(),
        }
    }
}

/// Error details
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

/// Error report for a failed probe
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub error: ErrorDetail,
    /// Remediation hints, possibly empty
    pub suggestions: Vec<String>,
}

impl ErrorResponse {
    /// Build the report for an error
    pub fn from_error(error: &Error) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: error.code(),
                message: error.to_string(),
            },
            suggestions: error.suggestions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_probe_response_from_transport() {
        let transport = TransportResponse::new(200, r#"{"success":true,"data":{"pong":1}}"#)
            .with_header("content-type", "application/json; charset=UTF-8");
        let response = ProbeResponse::new(
            "heartbeat",
            "https://site.local/wp-admin/admin-ajax.php",
            &transport,
            12,
        );

        assert!(response.success);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.response_time_ms, 12);
        assert_eq!(response.response["data"]["pong"], json!(1));
        assert_eq!(
            response.headers["content-type"],
            json!("application/json; charset=UTF-8")
        );
    }

    #[test]
    fn test_probe_response_serialization() {
        let response = ProbeResponse::new("ping", "u", &TransportResponse::new(403, "-1"), 3);

        let value = serde_json::to_value(&response).unwrap();
        for key in [
            "success",
            "action",
            "url",
            "status_code",
            "response_time_ms",
            "response",
            "headers",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["status_code"], json!(403));
        assert_eq!(value["response"], json!(-1));

        let deserialized: ProbeResponse = serde_json::from_value(value).unwrap();
        assert_eq!(deserialized.action, "ping");
    }

    #[test]
    fn test_error_response_shape() {
        let error = Error::AuthRequired {
            path: PathBuf::from("/tmp/auth.json"),
        };
        let value = serde_json::to_value(ErrorResponse::from_error(&error)).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"]["code"], json!("AUTH_REQUIRED"));
        assert_eq!(
            value["error"]["message"],
            json!("Auth file not found: /tmp/auth.json")
        );
        assert_eq!(value["suggestions"].as_array().unwrap().len(), 2);
    }
}
