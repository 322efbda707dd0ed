//! Network plumbing: the shared HTTP client and the connectivity probe.

pub mod client;
pub mod probe;

pub use client::{build_client, USER_AGENT};
pub use probe::{ConnectivityProbe, ProbeReport};
