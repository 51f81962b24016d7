//! Post synthesis through a chat completion API.

mod client;
pub mod prompts;
pub mod types;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, SynthesisMode};

pub use client::OpenAiClient;

/// Generated text for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    /// Only produced in multi-call mode.
    pub description: Option<String>,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("completion API key contains characters not allowed in a header")]
    InvalidCredential,
    #[error("completion request timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion API returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("completion response was malformed: {0}")]
    Malformed(String),
    #[error("completion API returned no text")]
    EmptyCompletion,
}

impl From<reqwest::Error> for SynthError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Transport(e)
        }
    }
}

/// Turns a topic plus news context into a draft post.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// `news` is the rendered digest, which may be a sentinel text.
    async fn synthesize(&self, topic: &str, news: &str) -> Result<Draft, SynthError>;
}

/// Title used when no title completion is made: `"{topic} | News {year}"`.
#[must_use]
pub fn default_title(topic: &str) -> String {
    format!("{topic} | News {}", Utc::now().year())
}

/// Synthesizer backed by [`OpenAiClient`].
#[derive(Clone)]
pub struct PostWriter {
    client: OpenAiClient,
    mode: SynthesisMode,
    language: String,
}

impl PostWriter {
    #[must_use]
    pub fn new(client: OpenAiClient, mode: SynthesisMode, language: impl Into<String>) -> Self {
        Self {
            client,
            mode,
            language: language.into(),
        }
    }

    /// Build a writer when the completion credential is configured.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = config.openai_api_key.as_deref() else {
            return Ok(None);
        };
        let client = OpenAiClient::new(config, api_key)?;
        Ok(Some(Self::new(
            client,
            config.synthesis_mode,
            config.post_language.clone(),
        )))
    }

    async fn write_single(&self, topic: &str, news: &str) -> Result<Draft, SynthError> {
        let body = self
            .client
            .complete(
                prompts::single_post(topic, news, &self.language),
                prompts::SINGLE_POST,
            )
            .await?;

        Ok(Draft {
            title: default_title(topic),
            description: None,
            body,
        })
    }

    async fn write_multi(&self, topic: &str, news: &str) -> Result<Draft, SynthError> {
        let raw_title = self
            .client
            .complete(prompts::title(topic, news, &self.language), prompts::TITLE)
            .await
            .inspect_err(|e| warn!(stage = "title", error = %e, "Completion failed"))?;
        let mut title = prompts::clean_title(&raw_title);
        if title.is_empty() {
            title = default_title(topic);
        }
        debug!(title = %title, "Title generated");

        let raw_description = self
            .client
            .complete(
                prompts::description(topic, &title, &self.language),
                prompts::DESCRIPTION,
            )
            .await
            .inspect_err(|e| warn!(stage = "description", error = %e, "Completion failed"))?;
        let description = prompts::clean_description(&raw_description);

        let body = self
            .client
            .complete(
                prompts::body(topic, &title, news, &self.language),
                prompts::BODY,
            )
            .await
            .inspect_err(|e| warn!(stage = "body", error = %e, "Completion failed"))?;

        Ok(Draft {
            title,
            description: Some(description).filter(|d| !d.is_empty()),
            body,
        })
    }
}

#[async_trait]
impl Synthesizer for PostWriter {
    async fn synthesize(&self, topic: &str, news: &str) -> Result<Draft, SynthError> {
        info!(
            topic = %topic,
            mode = self.mode.as_str(),
            model = %self.client.model(),
            "Synthesizing post"
        );
        match self.mode {
            SynthesisMode::Single => self.write_single(topic, news).await,
            SynthesisMode::Multi => self.write_multi(topic, news).await,
        }
    }
}
