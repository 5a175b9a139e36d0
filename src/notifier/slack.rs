// Standard library
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use url::Url;

// Current module imports
use super::errors::NotificationError;
use super::traits::Notifier;

/// Upper bound for one webhook delivery.
const NOTIFICATION_TIMEOUT_SECS: u64 = 10;

/// Posts messages to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    webhook_url: Url,
    client: Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: Url) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, message: &str) -> Result<String, NotificationError> {
        debug!(webhook = %self.webhook_url.host_str().unwrap_or_default(), "Sending notification");

        let response = self
            .client
            .post(self.webhook_url.clone())
            .timeout(Duration::from_secs(NOTIFICATION_TIMEOUT_SECS))
            .json(&json!({ "text": message }))
            .send()
            .await?;

        let status = response.status();
        let body: String = response.text().await?;

        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
