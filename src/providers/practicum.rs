use crate::core::credentials::Credentials;
use crate::core::error::BotError;
use crate::core::models::PollCursor;
use crate::core::settings::ApiSettings;
use crate::providers::HomeworkSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(settings: &ApiSettings, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build Practicum HTTP client")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            token: credentials.practicum_token.clone(),
        })
    }

    fn connection_error(&self, from_date: PollCursor, source: reqwest::Error) -> BotError {
        BotError::Connection {
            url: self.endpoint.clone(),
            params: format!("from_date={}", from_date),
            source,
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    #[tracing::instrument(skip_all, fields(%from_date))]
    async fn fetch(&self, from_date: PollCursor) -> Result<Value, BotError> {
        tracing::debug!(url = %self.endpoint, %from_date, "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date.timestamp())])
            .send()
            .await
            .map_err(|e| self.connection_error(from_date, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::EndpointStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| self.connection_error(from_date, e))?;

        tracing::debug!("Received response from Practicum API");
        Ok(body)
    }
}
