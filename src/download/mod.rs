//! Download module.
//!
//! Streams the signage image and playlist into the staging folder.

pub mod fetch;

pub use fetch::{Fetcher, CHUNK_SIZE};
