//! HTTP API client for the codebreaker service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use codebreaker::{
    RemoteService,
    entities::PaletteSize,
    errors::ServiceError,
    messages::{FeedbackRequest, FeedbackResponse, ProposalResponse, StartAck, StartRequest},
};
use log::debug;
use std::time::Duration;

/// API client for communicating with the codebreaker service
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: normalize_base_url(base_url),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Turn a non-success reply into a [`ServiceError`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
    Err(ServiceError::from_body(status.as_u16(), &body).into())
}

#[async_trait]
impl RemoteService for ApiClient {
    async fn start(&self, palette_size: PaletteSize) -> Result<StartAck> {
        let request = StartRequest {
            palette_size: palette_size.get(),
        };
        debug!("POST /start with {} colors", request.palette_size);

        let response = self
            .client
            .post(self.url("/start"))
            .json(&request)
            .send()
            .await
            .context("Failed to send start request")?;
        let body = ensure_success(response)
            .await?
            .text()
            .await
            .context("Failed to read start response")?;

        // The acknowledgement is free-form and may be empty.
        if body.trim().is_empty() {
            return Ok(StartAck::default());
        }
        serde_json::from_str(&body).context("Failed to parse start response")
    }

    async fn fetch_proposal(&self) -> Result<ProposalResponse> {
        debug!("GET /proposal");
        let response = self
            .client
            .get(self.url("/proposal"))
            .send()
            .await
            .context("Failed to send proposal request")?;

        ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse proposal response")
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<FeedbackResponse> {
        debug!("POST /respond with {} hits", feedback.hits);
        let response = self
            .client
            .post(self.url("/respond"))
            .json(feedback)
            .send()
            .await
            .context("Failed to send feedback request")?;

        ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse feedback response")
    }
}
