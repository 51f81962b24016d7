//! Shared constants used across the application.

/// User agent sent with outbound API requests.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default NewsData.io search endpoint.
pub const DEFAULT_NEWS_API_URL: &str = "https://newsdata.io/api/1/news";

/// Default OpenAI-compatible API base URL (without `/chat/completions`).
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Upper bound on headlines requested per lookup.
pub const MAX_NEWS_PAGE_SIZE: usize = 10;

/// Longest title kept from the title completion, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

/// Longest meta description kept from the description completion, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 160;
