//! Chat webhook notifications.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::Notifier;

/// Body accepted by the chat webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub text: &'a str,
}

/// Posts notifications to a chat webhook; without a URL it only logs them.
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            config.notify.webhook_url.clone(),
            config.notify_timeout(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    async fn post(&self, url: &str, message: &str) -> Result<StatusCode> {
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { text: message })
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transfer(format!(
                "Webhook returned status {}: {}",
                status, body
            )));
        }

        Ok(status)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Option<StatusCode> {
        let Some(url) = self.url.as_deref() else {
            tracing::info!(text = message, "notification (no webhook configured)");
            return None;
        };

        match self.post(url, message).await {
            Ok(status) => {
                tracing::debug!(%status, "webhook sent successfully");
                Some(status)
            }
            Err(e) => {
                tracing::warn!(error = %e, "webhook failed");
                None
            }
        }
    }
}
