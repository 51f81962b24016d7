//! Prompt text and sampling parameters for each completion call.

use super::client::truncate_chars;
use super::types::{ChatMessage, Sampling};
use crate::constants::{MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};

pub const SINGLE_POST: Sampling = Sampling {
    max_tokens: 1200,
    temperature: 0.7,
    presence_penalty: None,
    frequency_penalty: None,
};

pub const TITLE: Sampling = Sampling {
    max_tokens: 40,
    temperature: 0.7,
    presence_penalty: None,
    frequency_penalty: None,
};

pub const DESCRIPTION: Sampling = Sampling {
    max_tokens: 120,
    temperature: 0.7,
    presence_penalty: None,
    frequency_penalty: None,
};

pub const BODY: Sampling = Sampling {
    max_tokens: 2500,
    temperature: 0.7,
    presence_penalty: Some(0.3),
    frequency_penalty: Some(0.3),
};

fn system(language: &str) -> ChatMessage {
    ChatMessage::system(format!(
        "You are an experienced journalist and blog editor. Write in {language}. \
         Use the supplied news as context when it is relevant and never invent quotes or figures."
    ))
}

/// One-shot post: Markdown body with subheadings.
pub fn single_post(topic: &str, news: &str, language: &str) -> Vec<ChatMessage> {
    vec![
        system(language),
        ChatMessage::user(format!(
            "Write an article about '{topic}'.\n\n\
             News:\n{news}\n\n\
             Format: Markdown, 800-1200 characters, 3 subheadings."
        )),
    ]
}

pub fn title(topic: &str, news: &str, language: &str) -> Vec<ChatMessage> {
    vec![
        system(language),
        ChatMessage::user(format!(
            "Write one headline for a blog post about '{topic}'. \
             It must contain the keyword '{topic}', fit on one line and be at most \
             {MAX_TITLE_CHARS} characters. Return only the headline, without quotes.\n\n\
             Recent news:\n{news}"
        )),
    ]
}

pub fn description(topic: &str, title: &str, language: &str) -> Vec<ChatMessage> {
    vec![
        system(language),
        ChatMessage::user(format!(
            "Write a meta description for the article \"{title}\" about '{topic}'. \
             At most {MAX_DESCRIPTION_CHARS} characters, one sentence or two, \
             ending with a call to action. Return only the description."
        )),
    ]
}

pub fn body(topic: &str, title: &str, news: &str, language: &str) -> Vec<ChatMessage> {
    vec![
        system(language),
        ChatMessage::user(format!(
            "Write the full article \"{title}\" about '{topic}'.\n\n\
             Requirements:\n\
             - at least 1500 characters, Markdown\n\
             - an introduction\n\
             - 3 to 4 themed sections, each under its own subheading\n\
             - a conclusion\n\n\
             Context from recent news:\n{news}"
        )),
    ]
}

/// Reduce a title completion to one clean line of at most `MAX_TITLE_CHARS`.
pub fn clean_title(raw: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let line = line.trim_start_matches('#').trim();
    let line = strip_quotes(line).trim_end_matches('.').trim();
    truncate_chars(line, MAX_TITLE_CHARS).trim_end().to_string()
}

/// Collapse a description completion to one line of at most `MAX_DESCRIPTION_CHARS`.
pub fn clean_description(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let line = strip_quotes(&joined);
    truncate_chars(line, MAX_DESCRIPTION_CHARS).trim_end().to_string()
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, '"' | '\'' | '«' | '»' | '“' | '”'))
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::types::Role;

    #[test]
    fn test_single_post_embeds_topic_and_news() {
        let news = "• EV sales surge\n• Battery breakthrough announced";
        let messages = single_post("electric vehicles", news, "English");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("English"));
        assert!(messages[1].content.contains("'electric vehicles'"));
        assert!(messages[1].content.contains(news));
        assert!(messages[1].content.contains("800-1200"));
    }

    #[test]
    fn test_description_references_title() {
        let messages = description("solar", "Solar power hits record", "English");
        assert!(messages[1].content.contains("\"Solar power hits record\""));
    }

    #[test]
    fn test_body_references_news() {
        let messages = body("solar", "Solar power hits record", "• Panels cheaper", "English");
        assert!(messages[1].content.contains("• Panels cheaper"));
        assert!(messages[1].content.contains("1500"));
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("\"Solar power hits record\"\n"), "Solar power hits record");
        assert_eq!(clean_title("\n\n# Headline here.\nsecond line"), "Headline here");
        let long = "a".repeat(100);
        assert_eq!(clean_title(&long).chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(
            clean_description("  Read the\nfull story   now!  "),
            "Read the full story now!"
        );
        let long = "word ".repeat(100);
        assert!(clean_description(&long).chars().count() <= MAX_DESCRIPTION_CHARS);
    }
}
