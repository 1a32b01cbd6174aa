// src/alignment/client.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use crate::alignment::models::{ChatRequest, ChatResponse};
use crate::utils::error::AlignError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Anything that can answer a chat completion request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AlignError>;
}

/// OpenAI-compatible chat completions client. One request per call, no retries.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AlignError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AlignError> {
        let url = self.completions_url();
        let start = std::time::Instant::now();
        tracing::info!("Sending alignment request to {} (model {})", url, request.model);

        let response = self
            .http_client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?; // Propagates reqwest::Error as AlignError::Network

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Model API error status: {} for URL: {}", status, url);
            return Err(AlignError::Api { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        tracing::debug!(
            "Model responded with {} choice(s) in {} ms",
            chat_response.choices.len(),
            start.elapsed().as_millis()
        );

        Ok(chat_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            OpenAiClient::new("sk-test", "https://proxy.example.com/v1/", Duration::from_secs(5))
                .unwrap();

        assert_eq!(client.completions_url(), "https://proxy.example.com/v1/chat/completions");
        assert_eq!(client.api_key, "sk-test");
    }
}
