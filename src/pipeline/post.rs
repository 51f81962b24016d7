use serde::{Deserialize, Serialize};

use crate::synth::SynthError;

/// Why a request ended in [`GeneratedPost::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationMissing,
    UpstreamUnavailable,
    UpstreamMalformed,
    UnexpectedFailure,
    InvalidTopic,
}

impl ErrorKind {
    /// Short remedy shown to the caller next to the error.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "Check that OPENAI_API_KEY holds a valid key",
            Self::UpstreamUnavailable => {
                "Text generation failed; check the API key, quota and network"
            }
            Self::UpstreamMalformed => "Text generation returned an unexpected response",
            Self::UnexpectedFailure => "Unexpected internal failure; see server logs",
            Self::InvalidTopic => r#"Send a JSON body like {"topic": "electric vehicles"}"#,
        }
    }
}

impl From<&SynthError> for ErrorKind {
    fn from(e: &SynthError) -> Self {
        match e {
            SynthError::InvalidCredential => Self::ConfigurationMissing,
            SynthError::Timeout(_) | SynthError::Transport(_) | SynthError::Status { .. } => {
                Self::UpstreamUnavailable
            }
            SynthError::Malformed(_) | SynthError::EmptyCompletion => Self::UpstreamMalformed,
        }
    }
}

/// Response body of `POST /generate-post`, one variant per terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum GeneratedPost {
    #[serde(rename = "success")]
    Success {
        topic: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        content: String,
        news_used: String,
        word_count: usize,
    },
    #[serde(rename = "ok-no-synthesizer")]
    Degraded {
        topic: String,
        title: String,
        content: String,
        news_used: String,
    },
    #[serde(rename = "error")]
    Failed {
        topic: String,
        error: String,
        error_kind: ErrorKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        news_used: Option<String>,
        hint: String,
    },
}

impl GeneratedPost {
    /// Build a failure whose hint follows from `kind`.
    #[must_use]
    pub fn failed(
        topic: impl Into<String>,
        kind: ErrorKind,
        error: impl Into<String>,
        news_used: Option<String>,
    ) -> Self {
        Self::Failed {
            topic: topic.into(),
            error: error.into(),
            error_kind: kind,
            news_used,
            hint: kind.hint().to_string(),
        }
    }

    /// Wire value of the `status` field.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Degraded { .. } => "ok-no-synthesizer",
            Self::Failed { .. } => "error",
        }
    }
}
