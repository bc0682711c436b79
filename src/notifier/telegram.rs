use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::info;

use crate::config::{Secret, TelegramConfig};
use crate::error::NotifyError;
use crate::notifier::Notifier;

/// Posts alerts to a single Telegram chat through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: Secret,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, config: &TelegramConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl Notifier for TelegramNotifier {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), Report<NotifyError>>> {
        Box::pin(async move {
            let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token.expose());
            let payload = SendMessage {
                chat_id: &self.chat_id,
                text,
            };

            // The bot token is part of the path, so strip the URL from transport errors
            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(reqwest::Error::without_url)
                .change_context(NotifyError::Request)?;

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                return Err(Report::new(NotifyError::Status)
                    .attach(format!("HTTP status: {status}"))
                    .attach(format!("body: {body}")));
            }

            info!(chat_id = %self.chat_id, "Notification sent: {text}");
            Ok(())
        })
    }
}
