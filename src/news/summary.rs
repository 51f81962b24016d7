use std::fmt;

/// Sentinel texts shown in place of headlines.
pub const CREDENTIAL_ABSENT: &str = "News API key is not configured";
pub const UNAVAILABLE: &str = "News is temporarily unavailable";
pub const UNREADABLE: &str = "News feed returned an unreadable response";
pub const LOOKUP_FAILED: &str = "News lookup failed; writing without news";
pub const NO_RESULTS: &str = "No news found for this topic";

/// Outcome of one news lookup: real headlines or exactly one sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsSummary {
    /// Non-empty, in the order the API returned them.
    Headlines(Vec<String>),
    CredentialAbsent,
    Unavailable,
    Unreadable,
    LookupFailed,
    NoResults,
}

impl NewsSummary {
    /// Wrap fetched headlines; an empty list becomes [`NewsSummary::NoResults`].
    #[must_use]
    pub fn from_headlines(headlines: Vec<String>) -> Self {
        if headlines.is_empty() {
            Self::NoResults
        } else {
            Self::Headlines(headlines)
        }
    }

    /// Render as a bullet list, or the sentinel text.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Headlines(items) => items
                .iter()
                .map(|h| format!("• {h}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::CredentialAbsent => CREDENTIAL_ABSENT.to_string(),
            Self::Unavailable => UNAVAILABLE.to_string(),
            Self::Unreadable => UNREADABLE.to_string(),
            Self::LookupFailed => LOOKUP_FAILED.to_string(),
            Self::NoResults => NO_RESULTS.to_string(),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Headlines(_))
    }
}

impl fmt::Display for NewsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Format one result as `"title (source)"` on a single line.
#[must_use]
pub fn format_headline(title: Option<&str>, source: Option<&str>) -> String {
    let title = title
        .map(collapse_whitespace)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());
    match source.map(collapse_whitespace).filter(|s| !s.is_empty()) {
        Some(source) => format!("{title} ({source})"),
        None => title,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
