//! Command-line front end
//!
//! Argument handling, logging setup and result rendering for the
//! `wp-ajax-probe` binary.

pub mod output;
pub mod probe;

pub use output::OutputFormat;
pub use probe::{ProbeArgs, run_probe_mode};
