use std::time::Duration;

use async_trait::async_trait;
use depthwatch_ports::{DeliveryError, NotificationSink};
use reqwest::Client;
use serde::Serialize;

use crate::error::RestError;

/// Telegram Bot API root
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Delivers notifications to a single Telegram chat
#[derive(Clone)]
pub struct TelegramSink {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramSink {
    /// `timeout` bounds each `sendMessage` request
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RestError> {
        Self::with_api_url(TELEGRAM_API_URL, token, chat_id, timeout)
    }

    /// Point the sink at a different Bot API host (proxies, tests)
    pub fn with_api_url(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RestError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    async fn send_message(&self, text: &str) -> Result<(), RestError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let resp = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RestError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn notify(&self, message: &str) -> Result<(), DeliveryError> {
        // reqwest errors embed the request URL, and with it the bot token
        self.send_message(message).await.map_err(|err| match err {
            RestError::Http(e) if e.is_timeout() => DeliveryError::Timeout,
            RestError::Http(e) => DeliveryError::Transport(e.without_url().to_string()),
            other => other.into(),
        })
    }
}
