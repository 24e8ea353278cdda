//! Configuration management for the probe
//!
//! This module handles loading and layering configuration settings
//! from defaults, a TOML file and the environment.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{EndpointSettings, LoggingSettings, RequestSettings, Settings};
