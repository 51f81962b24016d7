//! News lookup against the NewsData.io search API.
//!
//! A lookup never fails: every degraded condition maps to a fixed sentinel
//! text so the pipeline can keep going without headlines.

mod summary;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::USER_AGENT;

pub use summary::{format_headline, NewsSummary};

/// Anything that can turn a topic into a headline digest.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Look up recent headlines for `topic`.
    ///
    /// Implementations absorb their own failures into a sentinel variant.
    async fn lookup(&self, topic: &str) -> NewsSummary;
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news API key is not configured")]
    MissingApiKey,
    #[error("news request timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("news request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("news API returned HTTP {0}")]
    Status(StatusCode),
    #[error("news API reported status '{0}'")]
    ApiStatus(String),
    #[error("news API response was malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        let e = e.without_url();
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Transport(e)
        }
    }
}

impl From<NewsError> for NewsSummary {
    fn from(e: NewsError) -> Self {
        match e {
            NewsError::MissingApiKey => Self::CredentialAbsent,
            NewsError::Timeout(_) | NewsError::Transport(_) => Self::LookupFailed,
            NewsError::Status(_) | NewsError::ApiStatus(_) => Self::Unavailable,
            NewsError::Malformed(_) => Self::Unreadable,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    title: Option<String>,
    source_id: Option<String>,
}

/// HTTP client for the news search endpoint.
#[derive(Clone)]
pub struct NewsClient {
    http: Client,
    api_url: String,
    api_key: Option<String>,
    language: String,
    page_size: usize,
}

impl NewsClient {
    /// Create a news client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.news_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create news HTTP client")?;

        Ok(Self {
            http,
            api_url: config.news_api_url.clone(),
            api_key: config.newsdata_api_key.clone(),
            language: config.news_language.clone(),
            page_size: config.news_page_size,
        })
    }

    /// Fetch up to `page_size` formatted headlines, in API order.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing, the request fails, or the
    /// response is not a successful result list.
    pub async fn fetch(&self, topic: &str) -> Result<Vec<String>, NewsError> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::MissingApiKey)?;
        let size = self.page_size.to_string();

        debug!(topic = %topic, language = %self.language, size = self.page_size, "Querying news API");

        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("apikey", api_key),
                ("q", topic),
                ("language", self.language.as_str()),
                ("size", size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsError::Status(status));
        }

        let body = response.text().await?;
        parse_headlines(&body, self.page_size)
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn lookup(&self, topic: &str) -> NewsSummary {
        match self.fetch(topic).await {
            Ok(headlines) => {
                info!(topic = %topic, count = headlines.len(), "News lookup complete");
                NewsSummary::from_headlines(headlines)
            }
            Err(e) => {
                warn!(topic = %topic, error = %e, "News lookup degraded");
                e.into()
            }
        }
    }
}

/// Parse a NewsData response body into formatted headlines.
fn parse_headlines(body: &str, limit: usize) -> Result<Vec<String>, NewsError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| NewsError::Malformed(e.to_string()))?;

    let status = json
        .get("status")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| NewsError::Malformed("missing 'status' field".to_string()))?;

    if status != "success" {
        return Err(NewsError::ApiStatus(status.to_string()));
    }

    let results = json
        .get("results")
        .cloned()
        .ok_or_else(|| NewsError::Malformed("missing 'results' field".to_string()))?;

    let articles: Vec<NewsArticle> =
        serde_json::from_value(results).map_err(|e| NewsError::Malformed(e.to_string()))?;

    Ok(articles
        .into_iter()
        .take(limit)
        .map(|a| format_headline(a.title.as_deref(), a.source_id.as_deref()))
        .collect())
}
