//! Error handling for the probe
//!
//! This module defines error types, their classification into user-facing
//! codes, and remediation suggestions.

pub mod types;

pub use types::{Error, ErrorCode, Result};
