//! Run notifications.
//!
//! Notification failures never propagate: the worst case is a log line.

pub mod webhook;

use async_trait::async_trait;
use reqwest::StatusCode;

pub use webhook::{WebhookNotifier, WebhookPayload};

/// Sends a human-readable message about the run to an external channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`; returns the response status when one was received.
    async fn notify(&self, message: &str) -> Option<StatusCode>;
}

/// Notifier that keeps messages in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Option<StatusCode> {
        self.messages.lock().unwrap().push(message.to_string());
        Some(StatusCode::OK)
    }
}
