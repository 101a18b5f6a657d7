//! Article domain types.
//!
//! `ArticleDraft` is what the generation gateway produces; `ArticleRecord`
//! is the durable row the store keeps. Drafts become records exactly once,
//! on a successful write, and are then mutated in place by edits.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One proposed article angle, derived from a project analysis.
///
/// Topics are immutable and referenced by position within their session's
/// topic list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Headline proposal
    pub title: String,
    /// Opening angle that grabs attention
    pub hook: String,
    /// Narrative arc of the piece
    pub angle: String,
    /// Who the piece is for
    pub target_audience: String,
    /// Suggested section headings
    #[serde(default)]
    pub estimated_sections: Vec<String>,
}

/// An `[IMAGE: ...]` placeholder embedded in the article body, paired with
/// the description an image generator would need. Always travels with its
/// owning article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePrompt {
    /// The literal placeholder token as it appears in the markdown
    pub marker: String,
    /// Textual description of the desired image
    pub description: String,
}

/// A freshly generated article, not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub subtitle: String,
    /// Body in markdown, with image placeholders still embedded
    pub markdown: String,
    pub tags: Vec<String>,
    pub image_prompts: Vec<ImagePrompt>,
}

/// A persisted article row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub markdown: String,
    pub tags: Vec<String>,
    pub image_prompts: Vec<ImagePrompt>,
    /// Owning project name, denormalized for the history view
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary row for the history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleListItem {
    pub id: String,
    pub title: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ArticleRecord> for ArticleListItem {
    fn from(record: &ArticleRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            project_name: record.project_name.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Partial update pushed by a client holding a working copy. Omitted
/// fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompts: Option<Vec<ImagePrompt>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl ArticleUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.markdown.is_none()
            && self.tags.is_none()
            && self.image_prompts.is_none()
            && self.project_name.is_none()
    }
}

/// One sharing post for a social platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    /// Voice of the post ("professional", "casual", ...)
    pub tone: String,
    pub text: String,
}

/// Per-platform sharing posts, keyed by platform name.
pub type SocialPosts = BTreeMap<String, Vec<SocialPost>>;

/// Estimated reach of a suggested tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagTraffic {
    High,
    Medium,
    Low,
}

/// One tag suggestion for an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSuggestion {
    pub name: String,
    pub reason: String,
    pub traffic: TagTraffic,
}

static IMAGE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[IMAGE:\s*(.+?)\]").expect("valid placeholder regex"));

/// Find every `[IMAGE: ...]` placeholder in a markdown body.
pub fn scan_image_prompts(markdown: &str) -> Vec<ImagePrompt> {
    IMAGE_PLACEHOLDER
        .captures_iter(markdown)
        .map(|cap| ImagePrompt {
            marker: cap.get(0).map_or_else(String::new, |m| m.as_str().to_string()),
            description: cap.get(1).map_or_else(String::new, |m| m.as_str().trim().to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_image_prompts() {
        let markdown = "Intro paragraph.\n\n[IMAGE: A laptop glowing at night]\n\nMore text.\n\n[IMAGE: Two phones side by side]\n";
        let prompts = scan_image_prompts(markdown);
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].marker, "[IMAGE: A laptop glowing at night]");
        assert_eq!(prompts[0].description, "A laptop glowing at night");
        assert_eq!(prompts[1].description, "Two phones side by side");
    }

    #[test]
    fn test_scan_image_prompts_none() {
        assert!(scan_image_prompts("No placeholders here.").is_empty());
    }

    #[test]
    fn test_article_update_is_empty() {
        assert!(ArticleUpdate::default().is_empty());
        let update = ArticleUpdate { title: Some("X".into()), ..Default::default() };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_list_item_from_record() {
        let now = Utc::now();
        let record = ArticleRecord {
            id: "abc".into(),
            title: "T".into(),
            subtitle: "S".into(),
            markdown: "body".into(),
            tags: vec!["Rust".into()],
            image_prompts: Vec::new(),
            project_name: "proj".into(),
            created_at: now,
            updated_at: now,
        };
        let item = ArticleListItem::from(&record);
        assert_eq!(item.id, "abc");
        assert_eq!(item.project_name, "proj");
    }

    #[test]
    fn test_tag_traffic_serde_lowercase() {
        let json = serde_json::to_string(&TagTraffic::High).unwrap();
        assert_eq!(json, "\"high\"");
        let back: TagTraffic = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(back, TagTraffic::Medium);
    }
}
