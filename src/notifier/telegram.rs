use crate::core::credentials::Credentials;
use crate::core::settings::TelegramSettings;
use crate::notifier::Notifier;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Bot API limit for a single message, in characters.
const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(settings: &TelegramSettings, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build Telegram HTTP client")?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                settings.api_url.trim_end_matches('/'),
                credentials.telegram_token
            ),
            chat_id: credentials.telegram_chat_id.clone(),
        })
    }

    async fn send_chunk(&self, text: &str) -> Result<(), String> {
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(&self.send_url)
            .json(&payload)
            .send()
            .await
            // the URL carries the bot token
            .map_err(|e| format!("sendMessage request failed: {}", e.without_url()))?;

        let status = response.status();
        let body: TgResponse = response
            .json()
            .await
            .map_err(|e| format!("sendMessage returned {status}, unreadable body: {}", e.without_url()))?;

        if !body.ok || !status.is_success() {
            return Err(body
                .description
                .unwrap_or_else(|| format!("sendMessage failed with {status}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[tracing::instrument(skip_all)]
    async fn notify(&self, text: &str) -> bool {
        tracing::debug!(text, "Sending Telegram message");

        for chunk in split_message(text) {
            if let Err(e) = self.send_chunk(&chunk).await {
                tracing::error!(error = %e, text, "Telegram message was not sent");
                return false;
            }
        }

        tracing::debug!(text, "Telegram message sent");
        true
    }
}

fn split_message(text: &str) -> Vec<String> {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_MESSAGE_CHARS)
        .map(|c| c.iter().collect())
        .collect()
}
