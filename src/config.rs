use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    DEFAULT_NEWS_API_URL, DEFAULT_OPENAI_API_URL, DEFAULT_OPENAI_MODEL, MAX_NEWS_PAGE_SIZE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
///
/// Built once at startup and shared read-only for the process lifetime.
#[derive(Clone)]
pub struct Config {
    // Credentials
    pub newsdata_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub strict_credentials: bool,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // News search
    pub news_api_url: String,
    pub news_language: String,
    pub news_page_size: usize,
    pub news_timeout: Duration,

    // Text generation
    pub openai_api_url: String,
    pub openai_model: String,
    pub openai_timeout: Duration,
    pub synthesis_mode: SynthesisMode,
    pub post_language: String,
}

/// How many completion calls are spent on one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    /// One call producing the body; the title is derived locally.
    Single,
    /// Title, meta description and body each get their own call.
    Multi,
}

impl SynthesisMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "newsdata_api_key",
                &self.newsdata_api_key.as_deref().map(|_| "<redacted>"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_deref().map(|_| "<redacted>"),
            )
            .field("strict_credentials", &self.strict_credentials)
            .field("web_host", &self.web_host)
            .field("web_port", &self.web_port)
            .field("news_api_url", &self.news_api_url)
            .field("news_language", &self.news_language)
            .field("news_page_size", &self.news_page_size)
            .field("news_timeout", &self.news_timeout)
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_model", &self.openai_model)
            .field("openai_timeout", &self.openai_timeout)
            .field("synthesis_mode", &self.synthesis_mode)
            .field("post_language", &self.post_language)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Credentials
            newsdata_api_key: optional_env("NEWSDATA_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            strict_credentials: parse_env_bool("STRICT_CREDENTIALS", false)?,

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("PORT", 8000)?,

            // News search
            news_api_url: env_or_default("NEWS_API_URL", DEFAULT_NEWS_API_URL),
            news_language: env_or_default("NEWS_LANGUAGE", "en"),
            news_page_size: parse_env_usize("NEWS_PAGE_SIZE", 3)?,
            news_timeout: Duration::from_secs(parse_env_u64("NEWS_TIMEOUT_SECS", 10)?),

            // Text generation
            openai_api_url: env_or_default("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            openai_model: env_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            openai_timeout: Duration::from_secs(parse_env_u64("OPENAI_TIMEOUT_SECS", 60)?),
            synthesis_mode: parse_synthesis_mode(&env_or_default("SYNTHESIS_MODE", "single"))?,
            post_language: env_or_default("POST_LANGUAGE", "English"),
        })
    }

    /// Configuration with defaults and no credentials, independent of the
    /// process environment. Tests override fields with struct update syntax.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            newsdata_api_key: None,
            openai_api_key: None,
            strict_credentials: false,
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            news_api_url: DEFAULT_NEWS_API_URL.to_string(),
            news_language: "en".to_string(),
            news_page_size: 3,
            news_timeout: Duration::from_secs(2),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_timeout: Duration::from_secs(5),
            synthesis_mode: SynthesisMode::Single,
            post_language: "English".to_string(),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strict_credentials {
            if self.newsdata_api_key.is_none() {
                return Err(ConfigError::MissingEnvVar("NEWSDATA_API_KEY".to_string()));
            }
            if self.openai_api_key.is_none() {
                return Err(ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()));
            }
        }
        if self.news_page_size == 0 || self.news_page_size > MAX_NEWS_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                name: "NEWS_PAGE_SIZE".to_string(),
                message: format!("must be between 1 and {MAX_NEWS_PAGE_SIZE}"),
            });
        }
        if self.news_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "NEWS_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.openai_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "OPENAI_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.openai_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "OPENAI_MODEL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn has_news_key(&self) -> bool {
        self.newsdata_api_key.is_some()
    }

    #[must_use]
    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_synthesis_mode(value: &str) -> Result<SynthesisMode, ConfigError> {
    match value.to_lowercase().as_str() {
        "single" => Ok(SynthesisMode::Single),
        "multi" => Ok(SynthesisMode::Multi),
        _ => Err(ConfigError::InvalidValue {
            name: "SYNTHESIS_MODE".to_string(),
            message: format!("must be 'single' or 'multi', got '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_synthesis_mode() {
        assert_eq!(parse_synthesis_mode("single").unwrap(), SynthesisMode::Single);
        assert_eq!(parse_synthesis_mode("MULTI").unwrap(), SynthesisMode::Multi);
        assert!(parse_synthesis_mode("triple").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_env_bool("NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("NONEXISTENT_VAR", false).unwrap());
    }

    #[test]
    fn test_for_testing_is_valid() {
        assert!(Config::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let config = Config {
            news_page_size: 0,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());

        let config = Config {
            news_page_size: MAX_NEWS_PAGE_SIZE + 1,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strict_credentials_requires_both_keys() {
        let config = Config {
            strict_credentials: true,
            newsdata_api_key: Some("news".to_string()),
            ..Config::for_testing()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let config = Config {
            strict_credentials: true,
            newsdata_api_key: Some("news".to_string()),
            openai_api_key: Some("sk-test".to_string()),
            ..Config::for_testing()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = Config {
            newsdata_api_key: Some("pub_secret_value".to_string()),
            openai_api_key: Some("sk-secret-value".to_string()),
            ..Config::for_testing()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("pub_secret_value"));
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("<redacted>"));
    }
}
