//! Outbound connectivity check.
//!
//! A plain TCP connect to a well-known public endpoint is enough to tell
//! whether the device has a working uplink before any download starts.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::notify::Notifier;

/// Result of a full probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub reachable: bool,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// TCP reachability probe with fixed-delay retries.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    address: String,
    max_attempts: u32,
    retry_delay: Duration,
    connect_timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(
        address: impl Into<String>,
        max_attempts: u32,
        retry_delay: Duration,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            address: address.into(),
            max_attempts: max_attempts.max(1),
            retry_delay,
            connect_timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(
            config.address.clone(),
            config.max_attempts,
            Duration::from_secs(config.retry_delay_seconds),
            Duration::from_secs(config.connect_timeout_seconds),
        )
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the endpoint could be reached within the allowed attempts.
    pub async fn probe(&self, notifier: &dyn Notifier) -> bool {
        self.run(notifier).await.reachable
    }

    /// Probe, retrying after `retry_delay` between failed attempts.
    ///
    /// Sends exactly one failure notification when every attempt fails.
    pub async fn run(&self, notifier: &dyn Notifier) -> ProbeReport {
        for attempt in 1..=self.max_attempts {
            match self.attempt().await {
                Ok(()) => {
                    tracing::debug!(address = %self.address, attempt, "connectivity confirmed");
                    return ProbeReport {
                        reachable: true,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        address = %self.address,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "connectivity check failed"
                    );
                    if attempt < self.max_attempts {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        let error = Error::Connectivity {
            address: self.address.clone(),
            attempts: self.max_attempts,
        };
        tracing::error!("{}", error);
        notifier.notify(&format!("PiInk: {}", error)).await;

        ProbeReport {
            reachable: false,
            attempts: self.max_attempts,
        }
    }

    async fn attempt(&self) -> Result<()> {
        match timeout(self.connect_timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => Err(Error::Transfer(format!(
                "connect timed out after {:?}",
                self.connect_timeout
            ))),
        }
    }
}
