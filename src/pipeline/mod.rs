//! Two-stage post generation: news lookup, then synthesis.
//!
//! Every request ends in exactly one [`GeneratedPost`]; nothing escapes
//! [`Pipeline::run`] as an error or a panic.

mod post;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;
use futures_util::FutureExt;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::news::{NewsClient, NewsSource};
use crate::synth::{default_title, PostWriter, Synthesizer};

pub use post::{ErrorKind, GeneratedPost};

/// Prefix of the body returned when no synthesizer is configured.
pub const SYNTHESIZER_UNAVAILABLE: &str = "Text generation is unavailable.";

/// Number of whitespace-delimited tokens in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Orchestrates one news source and an optional synthesizer.
#[derive(Clone)]
pub struct Pipeline {
    news: Arc<dyn NewsSource>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(news: Arc<dyn NewsSource>, synthesizer: Option<Arc<dyn Synthesizer>>) -> Self {
        Self { news, synthesizer }
    }

    /// Wire the real clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let news: Arc<dyn NewsSource> = Arc::new(NewsClient::new(config)?);
        let synthesizer = PostWriter::from_config(config)?
            .map(|writer| Arc::new(writer) as Arc<dyn Synthesizer>);
        Ok(Self::new(news, synthesizer))
    }

    #[must_use]
    pub fn has_synthesizer(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Generate a post, converting a panic anywhere below into a failure.
    ///
    /// A panic during synthesis still reports the news already fetched; a
    /// panic inside the news source reports none.
    pub async fn run(&self, topic: &str) -> GeneratedPost {
        match AssertUnwindSafe(self.generate(topic)).catch_unwind().await {
            Ok(post) => post,
            Err(panic) => {
                error!(
                    topic = %topic,
                    panic = %panic_message(&*panic),
                    "Post generation panicked"
                );
                unexpected_failure(topic.trim(), None)
            }
        }
    }

    /// Generate a post for `topic`.
    pub async fn generate(&self, topic: &str) -> GeneratedPost {
        let topic = topic.trim();
        if topic.is_empty() {
            warn!("Rejected empty topic");
            return GeneratedPost::failed(
                topic,
                ErrorKind::InvalidTopic,
                "topic must not be empty",
                None,
            );
        }

        let summary = self.news.lookup(topic).await;
        info!(topic = %topic, news_degraded = summary.is_degraded(), "News stage finished");
        let news = summary.text();

        let Some(synthesizer) = &self.synthesizer else {
            info!(topic = %topic, "No synthesizer configured, returning news only");
            return GeneratedPost::Degraded {
                topic: topic.to_string(),
                title: default_title(topic),
                content: format!("{SYNTHESIZER_UNAVAILABLE}\n\n{news}"),
                news_used: news,
            };
        };

        let outcome = AssertUnwindSafe(synthesizer.synthesize(topic, &news))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(draft)) => {
                let word_count = word_count(&draft.body);
                info!(topic = %topic, word_count, "Post generated");
                GeneratedPost::Success {
                    topic: topic.to_string(),
                    title: draft.title,
                    description: draft.description,
                    content: draft.body,
                    news_used: news,
                    word_count,
                }
            }
            Ok(Err(e)) => {
                let kind = ErrorKind::from(&e);
                warn!(topic = %topic, error = %e, kind = ?kind, "Synthesis failed");
                GeneratedPost::failed(topic, kind, e.to_string(), Some(news))
            }
            Err(panic) => {
                error!(
                    topic = %topic,
                    panic = %panic_message(&*panic),
                    "Synthesis panicked"
                );
                unexpected_failure(topic, Some(news))
            }
        }
    }
}

fn unexpected_failure(topic: &str, news_used: Option<String>) -> GeneratedPost {
    GeneratedPost::failed(
        topic,
        ErrorKind::UnexpectedFailure,
        "internal error while generating the post",
        news_used,
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
