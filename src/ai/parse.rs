//! Parsers for raw generation output.
//!
//! The model is asked for strict JSON or a fixed trailer format, but raw
//! output still arrives wrapped in markdown fences, prefixed with chatty
//! preamble, or surrounded by commentary. Everything here is tolerant on
//! the way in and strict on the way out.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, WorkflowError};
use crate::workflow::article::{
    scan_image_prompts, ArticleDraft, SocialPost, SocialPosts, TagSuggestion, TagTraffic, Topic,
};
use crate::workflow::format::fix_list_spacing;

/// Maximum number of tags kept on an article.
pub const MAX_ARTICLE_TAGS: usize = 5;
/// Maximum number of tag suggestions returned.
pub const MAX_TAG_SUGGESTIONS: usize = 15;
/// Medium rejects tags longer than this.
pub const MAX_TAG_CHARS: usize = 25;

static JSON_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array regex"));
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object regex"));

/// Strip a wrapping markdown code fence, if present.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line itself (possibly carrying a language hint).
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

/// Locate the outermost JSON array in free-form text.
fn find_json_array(raw: &str) -> Option<&str> {
    JSON_ARRAY.find(raw).map(|m| m.as_str())
}

fn find_json_object(raw: &str) -> Option<&str> {
    JSON_OBJECT.find(raw).map(|m| m.as_str())
}

/// Parse a topic-list response into topics.
pub fn parse_topics(raw: &str) -> Result<Vec<Topic>> {
    let stripped = strip_fences(raw);
    let json = find_json_array(stripped).unwrap_or(stripped);

    #[derive(Deserialize)]
    struct TopicItem {
        #[serde(default)]
        title: String,
        #[serde(default)]
        hook: String,
        #[serde(default)]
        angle: String,
        #[serde(default)]
        target_audience: String,
        #[serde(default)]
        estimated_sections: Vec<String>,
    }

    let items: Vec<TopicItem> = serde_json::from_str(json).map_err(|e| {
        WorkflowError::GenerationFailed(format!(
            "failed to parse topics JSON ({e}); raw output:\n{}",
            head(raw, 500)
        ))
    })?;

    Ok(items
        .into_iter()
        .map(|item| Topic {
            title: item.title,
            hook: item.hook,
            angle: item.angle,
            target_audience: item.target_audience,
            estimated_sections: item.estimated_sections,
        })
        .collect())
}

/// Parse a title-suggestions response. Falls back to line splitting when
/// the JSON array is malformed; always returns at most five titles.
pub fn parse_titles(raw: &str) -> Vec<String> {
    let stripped = strip_fences(raw);

    if let Ok(titles) = serde_json::from_str::<Vec<String>>(stripped) {
        return titles.into_iter().take(5).collect();
    }
    if let Some(json) = find_json_array(stripped) {
        if let Ok(titles) = serde_json::from_str::<Vec<String>>(json) {
            return titles.into_iter().take(5).collect();
        }
    }

    stripped
        .lines()
        .filter_map(|line| {
            let cleaned = line
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || matches!(c, '.' | '-' | ')' | ' ')
                });
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
        .take(5)
        .collect()
}

/// Parse a writer response into a draft.
///
/// The response body ends with `TAGS:` and `SUBTITLE:` trailer lines that
/// are lifted out of the markdown. Chatty preamble before the first real
/// content line is dropped, then Medium list-spacing rules are enforced
/// and image placeholders are indexed.
pub fn parse_article_draft(raw: &str, title: &str) -> ArticleDraft {
    let mut tags: Vec<String> = Vec::new();
    let mut subtitle = String::new();
    let mut body_lines: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("TAGS:") {
            tags = rest
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        } else if let Some(rest) = trimmed.strip_prefix("SUBTITLE:") {
            subtitle = rest.trim().to_string();
        } else {
            body_lines.push(line);
        }
    }
    tags.truncate(MAX_ARTICLE_TAGS);

    let markdown = strip_preamble(body_lines.join("\n").trim());
    let markdown = fix_list_spacing(&markdown);
    let image_prompts = scan_image_prompts(&markdown);

    ArticleDraft { title: title.to_string(), subtitle, markdown, tags, image_prompts }
}

/// Drop leading meta-chatter ("Here's the article...") before the first
/// substantive line. Only strips when every dropped line looks like
/// preamble: short, no heading, no image placeholder.
fn strip_preamble(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let is_content = |line: &str| {
        let s = line.trim();
        s.starts_with("##") || s.starts_with("[IMAGE:") || s.chars().count() > 80
    };

    let Some(first_content) = lines.iter().position(|l| is_content(l)) else {
        return markdown.to_string();
    };
    if first_content == 0 {
        return markdown.to_string();
    }

    let all_preamble = lines[..first_content].iter().all(|l| {
        let s = l.trim();
        s.is_empty() || (s.chars().count() < 80 && !s.starts_with('#') && !s.starts_with("[IMAGE:"))
    });
    if all_preamble {
        lines[first_content..].join("\n").trim().to_string()
    } else {
        markdown.to_string()
    }
}

/// Parse social posts for all platforms, substituting the article URL for
/// every `{url}` placeholder. On malformed JSON, fall back to minimal
/// posts built from the title and subtitle.
pub fn parse_social_posts(
    raw: &str,
    title: &str,
    subtitle: &str,
    article_url: &str,
) -> SocialPosts {
    let stripped = strip_fences(raw);
    let json = find_json_object(stripped).unwrap_or(stripped);

    let parsed: Option<SocialPosts> = serde_json::from_str(json).ok();
    match parsed {
        Some(mut posts) => {
            for platform in posts.values_mut() {
                for post in platform {
                    post.text = post.text.replace("{url}", article_url);
                }
            }
            posts
        }
        None => {
            let mut posts = SocialPosts::new();
            posts.insert(
                "twitter".to_string(),
                vec![SocialPost {
                    tone: "default".to_string(),
                    text: format!("{title} {article_url}"),
                }],
            );
            posts.insert(
                "linkedin".to_string(),
                vec![SocialPost {
                    tone: "default".to_string(),
                    text: format!("{title}\n\n{subtitle}\n\n{article_url}"),
                }],
            );
            posts
        }
    }
}

/// Parse tag suggestions. Unknown traffic levels default to medium,
/// unnamed entries are dropped, and the list is capped at fifteen.
pub fn parse_tag_suggestions(raw: &str) -> Vec<TagSuggestion> {
    let stripped = strip_fences(raw);
    let json = find_json_array(stripped).unwrap_or(stripped);

    #[derive(Deserialize)]
    struct Item {
        #[serde(default)]
        name: String,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        traffic: Option<TagTraffic>,
    }

    let Ok(items) = serde_json::from_str::<Vec<Item>>(json) else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter(|item| !item.name.is_empty())
        .take(MAX_TAG_SUGGESTIONS)
        .map(|item| TagSuggestion {
            name: item.name.chars().take(MAX_TAG_CHARS).collect(),
            reason: item.reason,
            traffic: item.traffic.unwrap_or(TagTraffic::Medium),
        })
        .collect()
}

fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_with_language_hint() {
        let raw = "```json\n[\"a\"]\n```";
        assert_eq!(strip_fences(raw), "[\"a\"]");
        assert_eq!(strip_fences("plain"), "plain");
    }

    #[test]
    fn test_parse_topics_with_surrounding_text() {
        let raw = r#"Here you go:
[{"title": "T", "hook": "H", "angle": "A", "target_audience": "devs", "estimated_sections": ["One", "Two"]}]
Hope that helps!"#;
        let topics = parse_topics(raw).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title, "T");
        assert_eq!(topics[0].estimated_sections, vec!["One", "Two"]);
    }

    #[test]
    fn test_parse_topics_bad_json_is_generation_failed() {
        let err = parse_topics("not json at all").unwrap_err();
        assert!(matches!(err, WorkflowError::GenerationFailed(_)));
    }

    #[test]
    fn test_parse_titles_json_and_fallback() {
        let titles = parse_titles(r#"["One", "Two", "Three", "Four", "Five", "Six"]"#);
        assert_eq!(titles.len(), 5);
        assert_eq!(titles[0], "One");

        let fallback = parse_titles("1. First title\n2) Second title\n- Third title");
        assert_eq!(fallback, vec!["First title", "Second title", "Third title"]);
    }

    #[test]
    fn test_parse_article_draft_lifts_trailer() {
        let raw = "## The Problem\n\nLong body text here.\n\n[IMAGE: a tired developer at night]\n\nTAGS: Rust, Programming, Software Development\nSUBTITLE: What we learned shipping it";
        let draft = parse_article_draft(raw, "My Title");

        assert_eq!(draft.title, "My Title");
        assert_eq!(draft.subtitle, "What we learned shipping it");
        assert_eq!(draft.tags, vec!["Rust", "Programming", "Software Development"]);
        assert!(!draft.markdown.contains("TAGS:"));
        assert!(!draft.markdown.contains("SUBTITLE:"));
        assert_eq!(draft.image_prompts.len(), 1);
        assert_eq!(draft.image_prompts[0].description, "a tired developer at night");
    }

    #[test]
    fn test_parse_article_draft_strips_preamble() {
        let raw = "Sure, here's the article:\n\n## The Hook\n\nBody.\n\nTAGS: Rust\nSUBTITLE: sub";
        let draft = parse_article_draft(raw, "T");
        assert!(draft.markdown.starts_with("## The Hook"));
    }

    #[test]
    fn test_parse_article_draft_keeps_long_opening_paragraph() {
        let opening = "It was 2am and the build had been red for six hours straight when we finally admitted the deploy pipeline was beyond saving.";
        let raw = format!("{opening}\n\n## What Happened\n\nTAGS: DevOps\nSUBTITLE: s");
        let draft = parse_article_draft(&raw, "T");
        assert!(draft.markdown.starts_with(opening));
    }

    #[test]
    fn test_parse_social_posts_replaces_url() {
        let raw = r#"{"twitter": [{"tone": "casual", "text": "read this {url}"}], "linkedin": []}"#;
        let posts = parse_social_posts(raw, "T", "S", "https://example.com/a");
        assert_eq!(posts["twitter"][0].text, "read this https://example.com/a");
    }

    #[test]
    fn test_parse_social_posts_fallback_on_garbage() {
        let posts = parse_social_posts("???", "Title", "Sub", "https://x.test");
        assert!(posts["twitter"][0].text.contains("Title"));
        assert!(posts["linkedin"][0].text.contains("https://x.test"));
    }

    #[test]
    fn test_parse_tag_suggestions_caps_and_defaults() {
        let raw = r#"[
            {"name": "Programming", "reason": "broad", "traffic": "high"},
            {"name": "SomeVeryLongTagNameThatExceedsTheLimit", "reason": "long"},
            {"name": "", "reason": "dropped"}
        ]"#;
        let tags = parse_tag_suggestions(raw);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].traffic, TagTraffic::High);
        assert_eq!(tags[1].name.chars().count(), MAX_TAG_CHARS);
        assert_eq!(tags[1].traffic, TagTraffic::Medium);
    }
}
