// DayzWatch - platform/telegram.rs
//
// Notifier backed by the Telegram Bot API (`sendMessage`).
//
// The bot token is part of the request URL, so the URL itself is never
// logged.

use crate::app::source::Notifier;
use crate::util::constants::{TELEGRAM_API_BASE_URL, TELEGRAM_PARSE_MODE, TELEGRAM_TIMEOUT_SECS};
use crate::util::error::NotifyError;
use serde::Serialize;
use std::time::Duration;

/// Body of a `sendMessage` call.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'static str,
}

/// Sends messages to one chat through one bot.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    bot_token: String,
    chat_id: String,
    base_url: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Create a notifier using Markdown formatting.
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TELEGRAM_TIMEOUT_SECS))
            .build()
            .map_err(|source| NotifyError::Http { source })?;
        Ok(Self {
            client,
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            base_url: TELEGRAM_API_BASE_URL.to_string(),
        })
    }

    /// Endpoint for `sendMessage`. Contains the bot token.
    fn api_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }

    /// Request body for `text`.
    pub fn payload<'a>(&'a self, text: &'a str) -> SendMessage<'a> {
        SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: TELEGRAM_PARSE_MODE,
        }
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        tracing::debug!(chars = message.chars().count(), "Sending Telegram notification");

        let response = self
            .client
            .post(self.api_url())
            .json(&self.payload(message))
            .send()
            .map_err(|source| NotifyError::Http {
                // The error's URL would leak the bot token into logs.
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Failed to send Telegram notification");
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Sent Telegram notification");
        Ok(())
    }
}
