//! reqwest-backed API client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{BiofeedbackApi, ClientError};
use crate::auth::TokenIssuer;
use crate::config::ApiConfig;
use crate::model::{BiofeedbackEntry, DateRange};

/// HTTP client for the biofeedback API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl HttpClient {
    /// Create a client for `base_url` (e.g. "http://localhost:8000")
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Builder method: attach a bearer token to submissions
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set or replace the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Normalized base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(map_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %text, "API returned error status");
            Err(ClientError::from_status(status.as_u16(), text))
        }
    }
}

fn map_transport(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(e.to_string())
    }
}

#[async_trait]
impl BiofeedbackApi for HttpClient {
    async fn fetch_entries(&self, range: &DateRange) -> Result<Vec<BiofeedbackEntry>, ClientError> {
        let url = self.endpoint("biofeedback");
        tracing::debug!(%url, range = %range.label(), "Fetching entries");

        let response = self
            .send(self.authorized(self.client.get(&url).query(&range.query_pairs())))
            .await?;

        let body = response.text().await.map_err(map_transport)?;
        let entries: Vec<BiofeedbackEntry> =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        tracing::debug!(count = entries.len(), "Fetched entries");
        Ok(entries)
    }

    async fn submit_entry(&self, entry: &Value) -> Result<(), ClientError> {
        let url = self.endpoint("biofeedback");
        tracing::debug!(%url, "Submitting entry");

        self.send(self.authorized(self.client.post(&url).json(entry)))
            .await?;

        Ok(())
    }
}

#[async_trait]
impl TokenIssuer for HttpClient {
    async fn issue_token(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let url = self.endpoint("token");

        let response = self
            .send(
                self.client
                    .post(&url)
                    .form(&[("username", username), ("password", password)]),
            )
            .await?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(token.access_token)
    }
}
