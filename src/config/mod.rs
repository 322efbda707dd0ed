//! Configuration module for piink-fetch.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Environment/CLI merging (see `cli`)
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    resolve_url, Config, NotifyConfig, OptionsConfig, OutputConfig, ProbeConfig, SourceConfig,
};
pub use modes::{FailurePolicy, PatchMode};
pub use validation::validate_config;
