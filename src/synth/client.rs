use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use super::types::{ChatMessage, ChatRequest, ChatResponse, Sampling};
use super::SynthError;
use crate::config::Config;
use crate::constants::USER_AGENT;

/// Longest slice of an upstream error body kept in error messages.
const ERROR_BODY_LIMIT: usize = 300;

/// Minimal client for an OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client for `api_key` using the endpoint and model from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, api_key: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.openai_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create completion HTTP client")?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: config.openai_api_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap, SynthError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| SynthError::InvalidCredential)?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send one chat completion and return the trimmed text of the first choice.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, transport failure, non-success status,
    /// an unparseable body, or an empty completion.
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        sampling: Sampling,
    ) -> Result<String, SynthError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            presence_penalty: sampling.presence_penalty,
            frequency_penalty: sampling.frequency_penalty,
        };

        debug!(model = %request.model, max_tokens = request.max_tokens, "Chat completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthError::Status {
                status,
                body: truncate_chars(body.trim(), ERROR_BODY_LIMIT),
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| SynthError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(SynthError::EmptyCompletion)
    }
}

/// Cut `s` to at most `max` characters without splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
