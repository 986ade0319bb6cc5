//! Chat notification sink
//!
//! Notifications are fire-and-forget: delivery problems are logged and
//! swallowed so they can never block or fail a run.

use crate::config::NotifyConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Request timeout for webhook deliveries in seconds
const NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Outbound chat notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message. Never fails; delivery problems are logged.
    async fn notify(&self, message: &str);
}

/// Notifier used when no webhook is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, message: &str) {
        debug!(message, "chat notification skipped (no webhook configured)");
    }
}

/// Webhook-backed notifier posting a JSON text payload
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier for the given webhook URL
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(NOTIFY_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) {
        let payload = serde_json::json!({ "text": message });
        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("chat notification delivered");
            }
            Ok(response) => {
                warn!(status = %response.status(), "chat notification rejected");
            }
            Err(e) => {
                warn!(error = %e, "chat notification failed");
            }
        }
    }
}

/// Build a notifier from configuration: webhook when set, otherwise a no-op
pub fn notifier_from_config(notify: &NotifyConfig) -> Result<Box<dyn Notifier>> {
    match notify.webhook_url.as_deref() {
        Some(url) => Ok(Box::new(WebhookNotifier::new(url)?)),
        None => Ok(Box::new(NullNotifier)),
    }
}
