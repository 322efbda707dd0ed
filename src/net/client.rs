//! Shared HTTP client.

use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};

/// User agent sent with downloads and webhook posts.
pub const USER_AGENT: &str = concat!("piink-fetch/", env!("CARGO_PKG_VERSION"));

/// Connect timeout for every HTTP request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client used by the fetcher and the notifier.
///
/// Request timeouts differ per use and are set on each request.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}
