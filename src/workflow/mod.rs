//! Content workflow: article types, markdown formatting, source
//! resolution and the orchestrator facade.

pub mod article;
pub mod format;
pub mod orchestrator;
pub mod source;

pub use article::{
    ArticleDraft, ArticleListItem, ArticleRecord, ArticleUpdate, ImagePrompt, SocialPost,
    SocialPosts, TagSuggestion, TagTraffic, Topic,
};
pub use orchestrator::{Health, Orchestrator, MAX_TOPIC_COUNT, MIN_TOPIC_COUNT};
