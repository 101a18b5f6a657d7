//! Generation gateway.
//!
//! All model calls go through [`Gateway`], which owns a boxed
//! [`Generator`] provider and applies the configured deadline to every
//! call. The typed methods pair each task's prompt with its parser so
//! callers only ever see domain types.

mod claude;
pub mod parse;
pub mod prompts;

pub use claude::ClaudeCli;

use std::time::Duration;

use async_trait::async_trait;

use crate::analyzer::ProjectSummary;
use crate::error::{Result, WorkflowError};
use crate::workflow::article::{ArticleDraft, SocialPosts, TagSuggestion, Topic};

/// Provider-level generation errors, before they are folded into the
/// workflow taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    NotInstalled(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("{0}")]
    EmptyOutput(String),

    #[error("{0}")]
    Process(String),
}

/// A text-generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a completion for the given system prompt and user message.
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> std::result::Result<String, GenerateError>;

    /// Provider name for logs and health reporting.
    fn name(&self) -> &str;

    /// Whether the backend can be reached at all.
    fn is_available(&self) -> bool;
}

/// Deadline-enforcing wrapper around a provider.
pub struct Gateway {
    provider: Box<dyn Generator>,
    timeout: Duration,
}

impl Gateway {
    pub fn new(provider: Box<dyn Generator>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Run one provider call under the configured deadline. On expiry the
    /// in-flight future is dropped, which tears down the provider's
    /// subprocess, and no state has been committed anywhere.
    async fn call(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let started = std::time::Instant::now();
        let outcome =
            tokio::time::timeout(self.timeout, self.provider.generate(system_prompt, user_message))
                .await;

        match outcome {
            Ok(Ok(text)) => {
                tracing::debug!(
                    provider = self.provider.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    chars = text.len(),
                    "generation complete"
                );
                Ok(text)
            }
            Ok(Err(e)) => Err(WorkflowError::GenerationFailed(e.to_string())),
            Err(_) => Err(WorkflowError::Timeout(self.timeout.as_secs())),
        }
    }

    /// Propose article topics for an analyzed project.
    pub async fn topics(
        &self,
        summary: &ProjectSummary,
        count: usize,
        language: &str,
    ) -> Result<Vec<Topic>> {
        let user = prompts::topic_user_message(summary, count, language);
        let raw = self.call(prompts::TOPIC_SYSTEM_PROMPT, &user).await?;
        parse::parse_topics(&raw)
    }

    /// Write a full article for one chosen topic.
    pub async fn write_article(
        &self,
        summary: &ProjectSummary,
        topic: &Topic,
        language: &str,
    ) -> Result<ArticleDraft> {
        let user = prompts::writer_user_message(summary, topic, language);
        let raw = self.call(prompts::WRITER_SYSTEM_PROMPT, &user).await?;
        Ok(parse::parse_article_draft(&raw, &topic.title))
    }

    /// Suggest five alternative titles for an article body.
    pub async fn titles(&self, markdown: &str, language: &str) -> Result<Vec<String>> {
        let user = prompts::titles_user_message(markdown, language);
        let raw = self.call(prompts::TITLES_SYSTEM_PROMPT, &user).await?;
        Ok(parse::parse_titles(&raw))
    }

    /// Apply a revision instruction to an article body, returning the
    /// fully revised markdown.
    pub async fn revise(
        &self,
        markdown: &str,
        instruction: &str,
        language: &str,
    ) -> Result<String> {
        let user = prompts::reviser_user_message(markdown, instruction, language);
        self.call(prompts::REVISER_SYSTEM_PROMPT, &user).await
    }

    /// Draft sharing posts for each platform, with the article URL
    /// substituted in.
    pub async fn social_posts(
        &self,
        title: &str,
        subtitle: &str,
        markdown: &str,
        article_url: &str,
        language: &str,
    ) -> Result<SocialPosts> {
        let user = prompts::social_user_message(title, subtitle, markdown, article_url, language);
        let raw = self.call(prompts::SOCIAL_SYSTEM_PROMPT, &user).await?;
        Ok(parse::parse_social_posts(&raw, title, subtitle, article_url))
    }

    /// Suggest visibility-maximizing tags for an article body.
    pub async fn tag_suggestions(
        &self,
        markdown: &str,
        language: &str,
    ) -> Result<Vec<TagSuggestion>> {
        let user = prompts::tags_user_message(markdown, language);
        let raw = self.call(prompts::TAGS_SYSTEM_PROMPT, &user).await?;
        Ok(parse::parse_tag_suggestions(&raw))
    }
}
