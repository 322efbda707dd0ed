//! Filesystem module.
//!
//! Provides:
//! - Staging and publish path layout
//! - Timestamp token naming

pub mod naming;
pub mod paths;

pub use naming::{sanitize_filename, TimestampToken, TOKEN_FORMAT};
pub use paths::{ensure_dir, ensure_parent, partial_path, PublishPaths, StagingPaths};
