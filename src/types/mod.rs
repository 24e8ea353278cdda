//! Type definitions for the probe
//!
//! This module contains the main data structures used for requests and reports.

pub mod request;
pub mod response;

pub use request::{AjaxPayload, NONCE_FIELD, ProbeRequest};
pub use response::{ErrorDetail, ErrorResponse, ProbeResponse};
