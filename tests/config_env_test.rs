//! Tests for loading configuration from the process environment.

use std::time::Duration;

use serial_test::serial;
use topic_post_generator::config::{Config, SynthesisMode};

const VARS: &[&str] = &[
    "NEWSDATA_API_KEY",
    "OPENAI_API_KEY",
    "STRICT_CREDENTIALS",
    "WEB_HOST",
    "PORT",
    "NEWS_API_URL",
    "NEWS_LANGUAGE",
    "NEWS_PAGE_SIZE",
    "NEWS_TIMEOUT_SECS",
    "OPENAI_API_URL",
    "OPENAI_MODEL",
    "OPENAI_TIMEOUT_SECS",
    "SYNTHESIS_MODE",
    "POST_LANGUAGE",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = Config::from_env().expect("defaults should load");

    assert!(config.newsdata_api_key.is_none());
    assert!(config.openai_api_key.is_none());
    assert_eq!(config.web_host, "0.0.0.0");
    assert_eq!(config.web_port, 8000);
    assert_eq!(config.news_api_url, "https://newsdata.io/api/1/news");
    assert_eq!(config.news_language, "en");
    assert_eq!(config.news_page_size, 3);
    assert_eq!(config.news_timeout, Duration::from_secs(10));
    assert_eq!(config.openai_model, "gpt-4o-mini");
    assert_eq!(config.synthesis_mode, SynthesisMode::Single);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_values_from_environment() {
    clear_env();
    std::env::set_var("NEWSDATA_API_KEY", "pub_abc");
    std::env::set_var("OPENAI_API_KEY", "sk-abc");
    std::env::set_var("PORT", "9090");
    std::env::set_var("NEWS_PAGE_SIZE", "5");
    std::env::set_var("SYNTHESIS_MODE", "multi");
    std::env::set_var("STRICT_CREDENTIALS", "yes");

    let config = Config::from_env().expect("config should load");

    assert_eq!(config.newsdata_api_key.as_deref(), Some("pub_abc"));
    assert_eq!(config.openai_api_key.as_deref(), Some("sk-abc"));
    assert_eq!(config.web_port, 9090);
    assert_eq!(config.news_page_size, 5);
    assert_eq!(config.synthesis_mode, SynthesisMode::Multi);
    assert!(config.strict_credentials);
    assert!(config.validate().is_ok());

    clear_env();
}

#[test]
#[serial]
fn test_blank_credentials_count_as_absent() {
    clear_env();
    std::env::set_var("OPENAI_API_KEY", "   ");
    std::env::set_var("STRICT_CREDENTIALS", "true");

    let config = Config::from_env().expect("config should load");

    assert!(!config.has_openai_key());
    assert!(config.validate().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    std::env::set_var("PORT", "not-a-port");
    assert!(Config::from_env().is_err());

    clear_env();
    std::env::set_var("SYNTHESIS_MODE", "sometimes");
    assert!(Config::from_env().is_err());

    clear_env();
}
