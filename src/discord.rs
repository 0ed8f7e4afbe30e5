use std::future::Future;

use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    pub content: String,
}

impl WebhookMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

pub trait Webhook {
    fn post(
        &self,
        url: &str,
        message: &WebhookMessage,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone, Default)]
pub struct DiscordWebhook {
    client: Client,
}

impl DiscordWebhook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Webhook for DiscordWebhook {
    async fn post(&self, url: &str, message: &WebhookMessage) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Delivery(e.without_url().into()))?;

        debug!("Discord responded with {}", response.status());
        Ok(())
    }
}

/// Logs messages rather than sending them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWebhook;

impl Webhook for LogWebhook {
    async fn post(&self, _url: &str, message: &WebhookMessage) -> Result<()> {
        info!("Would post to Discord: {}", message.content);
        Ok(())
    }
}
