//! Workflow orchestrator.
//!
//! Ties the analyzer, session registry, generation gateway and article
//! store together behind one facade. The CLI and the HTTP API both call
//! into this type and nothing else, so every validation rule lives here
//! exactly once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use crate::ai::Gateway;
use crate::analyzer::{analyze_project, ProjectSummary};
use crate::core::{ArticleStore, SessionManager, SessionStage};
use crate::error::{Result, WorkflowError};
use crate::workflow::article::{ArticleRecord, SocialPosts, TagSuggestion, Topic};
use crate::workflow::{format, source};

/// Smallest topic batch worth asking for.
pub const MIN_TOPIC_COUNT: usize = 3;
/// Largest topic batch a single request may ask for.
pub const MAX_TOPIC_COUNT: usize = 10;

/// Service health snapshot.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub provider: String,
    pub provider_available: bool,
    pub live_sessions: usize,
    pub stored_articles: usize,
}

/// Facade over the whole content workflow.
pub struct Orchestrator {
    sessions: SessionManager,
    store: Arc<ArticleStore>,
    gateway: Gateway,
}

impl Orchestrator {
    pub fn new(gateway: Gateway, store: Arc<ArticleStore>) -> Self {
        Self { sessions: SessionManager::new(), store, gateway }
    }

    /// The article store, for history operations that bypass generation.
    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    /// Analyze a local path or remote git URL and open a session for it.
    ///
    /// Cloning and tree walking are blocking work, moved off the async
    /// runtime. For remote sources the session keeps the temp checkout
    /// alive and the project is named after the URL, not the clone dir.
    pub async fn analyze(&self, source: &str) -> Result<(String, ProjectSummary)> {
        let source = source.trim();
        if source.is_empty() {
            return Err(WorkflowError::InvalidInput("project source is empty".to_string()));
        }

        let source_str = source.to_string();
        let display_name = source::project_name(source);
        let (mut summary, clone_dir) = tokio::task::spawn_blocking(move || {
            let resolved = source::resolve(&source_str)?;
            let summary = analyze_project(resolved.path())
                .map_err(|e| WorkflowError::SourceUnavailable(format!("analysis failed: {e}")))?;
            Ok::<_, WorkflowError>((summary, resolved.into_clone_dir()))
        })
        .await
        .context("analysis task panicked")??;

        if clone_dir.is_some() {
            summary.name = display_name;
        }

        let session_id = self.sessions.create(summary.clone(), clone_dir);
        tracing::info!(
            session = %session_id,
            project = %summary.name,
            files = summary.total_files,
            "project analyzed"
        );
        Ok((session_id, summary))
    }

    /// Generate topic proposals for an analyzed session. Replaces any
    /// previously generated list.
    pub async fn generate_topics(
        &self,
        session_id: &str,
        count: usize,
        language: &str,
    ) -> Result<Vec<Topic>> {
        if !(MIN_TOPIC_COUNT..=MAX_TOPIC_COUNT).contains(&count) {
            return Err(WorkflowError::InvalidInput(format!(
                "topic count {count} out of range ({MIN_TOPIC_COUNT}-{MAX_TOPIC_COUNT})"
            )));
        }

        let summary = self.sessions.get_summary(session_id)?;
        let topics = self.gateway.topics(&summary, count, language).await?;
        self.sessions.put_topics(session_id, topics.clone())?;
        tracing::info!(session = %session_id, count = topics.len(), "topics generated");
        Ok(topics)
    }

    /// Write a full article for one topic of a session and persist it.
    ///
    /// The topic list is not consumed: writing again with a different
    /// index on the same session produces another article.
    pub async fn write_article(
        &self,
        session_id: &str,
        topic_index: i64,
        language: &str,
    ) -> Result<ArticleRecord> {
        let (summary, topic) = {
            let session = self.sessions.get(session_id)?;
            let session = session.read();
            let topics = match &session.stage {
                SessionStage::TopicsReady(topics) => topics,
                SessionStage::Analyzed => {
                    return Err(WorkflowError::InvalidInput(
                        "no topics generated yet".to_string(),
                    ))
                }
            };
            if topic_index < 0 || topic_index as usize >= topics.len() {
                return Err(WorkflowError::InvalidInput(format!(
                    "topic index {topic_index} out of range (0-{})",
                    topics.len().saturating_sub(1)
                )));
            }
            (session.summary.clone(), topics[topic_index as usize].clone())
        };

        let draft = self.gateway.write_article(&summary, &topic, language).await?;
        let record = self.store.create(draft, &summary.name)?;
        tracing::info!(session = %session_id, article = %record.id, "article written");
        Ok(record)
    }

    /// Suggest up to five alternative titles for an article body.
    pub async fn suggest_titles(&self, markdown: &str, language: &str) -> Result<Vec<String>> {
        if markdown.trim().is_empty() {
            return Err(WorkflowError::InvalidInput("article body is empty".to_string()));
        }
        self.gateway.titles(markdown, language).await
    }

    /// Apply a revision instruction and return the revised body.
    pub async fn revise_article(
        &self,
        markdown: &str,
        instruction: &str,
        language: &str,
    ) -> Result<String> {
        if instruction.trim().is_empty() {
            return Err(WorkflowError::InvalidInput(
                "revision instruction is empty".to_string(),
            ));
        }
        self.gateway.revise(markdown, instruction, language).await
    }

    /// Draft per-platform sharing posts for a published article.
    pub async fn generate_social_posts(
        &self,
        title: &str,
        subtitle: &str,
        markdown: &str,
        article_url: &str,
        language: &str,
    ) -> Result<SocialPosts> {
        self.gateway.social_posts(title, subtitle, markdown, article_url, language).await
    }

    /// Suggest visibility tags for an article body.
    pub async fn suggest_tags(&self, markdown: &str, language: &str) -> Result<Vec<TagSuggestion>> {
        if markdown.trim().is_empty() {
            return Err(WorkflowError::InvalidInput("article body is empty".to_string()));
        }
        self.gateway.tag_suggestions(markdown, language).await
    }

    /// Write article markdown to a file, creating parent directories.
    /// The body gets the final Medium cleanup pass on the way out.
    /// Returns the absolute path written.
    pub fn save_to_path(&self, markdown: &str, output_path: &Path) -> Result<PathBuf> {
        let markdown = format::clean_markdown(markdown);
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating output dir {}", parent.display()))?;
            }
        }
        std::fs::write(output_path, markdown)
            .with_context(|| format!("writing article to {}", output_path.display()))?;
        let resolved = output_path
            .canonicalize()
            .with_context(|| format!("resolving {}", output_path.display()))?;
        tracing::info!(path = %resolved.display(), "article saved");
        Ok(resolved)
    }

    pub fn health(&self) -> Health {
        Health {
            status: "ok",
            provider: self.gateway.provider_name().to_string(),
            provider_available: self.gateway.is_available(),
            live_sessions: self.sessions.len(),
            stored_articles: self.store.count(),
        }
    }
}
