//! Article history store.
//!
//! Durable keyed storage for generated articles, backed by a single JSON
//! file under the data directory. The store exclusively owns the persisted
//! rows; clients hold working copies and push updates, last write wins.
//!
//! Every save call bumps `updated_at`, including saves that change
//! nothing. That is the policy, not an accident: the history view sorts by
//! recency of attention, not by content novelty.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Result, WorkflowError};
use crate::workflow::article::{ArticleDraft, ArticleListItem, ArticleRecord, ArticleUpdate};

/// JSON-file-backed article store.
///
/// Reads are concurrent; mutations hold the write lock across the
/// in-memory change and the file write, so no reader ever observes a
/// partially updated record.
pub struct ArticleStore {
    path: PathBuf,
    articles: RwLock<HashMap<String, ArticleRecord>>,
}

impl ArticleStore {
    /// Open (or create) the store at the given file path.
    pub fn open(path: PathBuf) -> Result<Self> {
        let articles = Self::load(&path)?;
        Ok(Self { path, articles: RwLock::new(articles) })
    }

    fn load(path: &PathBuf) -> Result<HashMap<String, ArticleRecord>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading article store at {}", path.display()))?;
        let records: Vec<ArticleRecord> =
            serde_json::from_str(&content).context("parsing article store")?;
        Ok(records.into_iter().map(|r| (r.id.clone(), r)).collect())
    }

    /// Persist the current map. Called with the write lock held.
    fn save(&self, articles: &HashMap<String, ArticleRecord>) -> Result<()> {
        let mut records: Vec<&ArticleRecord> = articles.values().collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let content =
            serde_json::to_string_pretty(&records).context("serializing article store")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating data dir {}", parent.display()))?;
        }
        fs::write(&self.path, content)
            .with_context(|| format!("writing article store at {}", self.path.display()))?;
        Ok(())
    }

    /// Where this store persists its records.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Persist a new article; assigns the id and both timestamps.
    pub fn create(&self, draft: ArticleDraft, project_name: &str) -> Result<ArticleRecord> {
        let now = Utc::now();
        let record = ArticleRecord {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            subtitle: draft.subtitle,
            markdown: draft.markdown,
            tags: draft.tags,
            image_prompts: draft.image_prompts,
            project_name: project_name.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut articles = self.articles.write();
        articles.insert(record.id.clone(), record.clone());
        self.save(&articles)?;
        tracing::info!(article = %record.id, title = %record.title, "article persisted");
        Ok(record)
    }

    /// Fetch a full article by id.
    pub fn get(&self, id: &str) -> Result<ArticleRecord> {
        self.articles
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound(format!("article {id}")))
    }

    /// History listing, most recently updated first.
    pub fn list(&self) -> Vec<ArticleListItem> {
        let articles = self.articles.read();
        let mut items: Vec<ArticleListItem> = articles.values().map(Into::into).collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
        items
    }

    /// Merge the provided fields into an existing record. Omitted fields
    /// keep their value; `updated_at` always moves forward.
    pub fn update(&self, id: &str, update: ArticleUpdate) -> Result<ArticleRecord> {
        if update.is_empty() {
            return Err(WorkflowError::InvalidInput("no fields to update".to_string()));
        }

        let mut articles = self.articles.write();
        let record = articles
            .get_mut(id)
            .ok_or_else(|| WorkflowError::NotFound(format!("article {id}")))?;

        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(subtitle) = update.subtitle {
            record.subtitle = subtitle;
        }
        if let Some(markdown) = update.markdown {
            record.markdown = markdown;
        }
        if let Some(tags) = update.tags {
            record.tags = tags;
        }
        if let Some(image_prompts) = update.image_prompts {
            record.image_prompts = image_prompts;
        }
        if let Some(project_name) = update.project_name {
            record.project_name = project_name;
        }

        // Guard against clock granularity: updated_at is strictly greater
        // after every save.
        let mut now = Utc::now();
        if now <= record.updated_at {
            now = record.updated_at + ChronoDuration::nanoseconds(1);
        }
        record.updated_at = now;

        let updated = record.clone();
        self.save(&articles)?;
        Ok(updated)
    }

    /// Remove a record. A second delete of the same id reports `NotFound`,
    /// which callers may treat as success-equivalent.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut articles = self.articles.write();
        if articles.remove(id).is_none() {
            return Err(WorkflowError::NotFound(format!("article {id}")));
        }
        self.save(&articles)?;
        tracing::info!(article = %id, "article deleted");
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.articles.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::article::ImagePrompt;

    fn store() -> (tempfile::TempDir, ArticleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::open(dir.path().join("articles.json")).unwrap();
        (dir, store)
    }

    fn draft(title: &str) -> ArticleDraft {
        ArticleDraft {
            title: title.to_string(),
            subtitle: "sub".to_string(),
            markdown: "## Body\nText.".to_string(),
            tags: vec!["Rust".to_string(), "Programming".to_string()],
            image_prompts: vec![ImagePrompt {
                marker: "[IMAGE: a desk]".to_string(),
                description: "a desk".to_string(),
            }],
        }
    }

    #[test]
    fn test_create_then_get_roundtrip() {
        let (_dir, store) = store();
        let record = store.create(draft("First"), "demo").unwrap();

        let fetched = store.get(&record.id).unwrap();
        assert_eq!(fetched.title, "First");
        assert_eq!(fetched.subtitle, "sub");
        assert_eq!(fetched.markdown, "## Body\nText.");
        assert_eq!(fetched.tags, vec!["Rust", "Programming"]);
        assert_eq!(fetched.image_prompts, record.image_prompts);
        assert_eq!(fetched.project_name, "demo");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.get("nope"), Err(WorkflowError::NotFound(_))));
    }

    #[test]
    fn test_update_merges_and_bumps_timestamp() {
        let (_dir, store) = store();
        let record = store.create(draft("Original"), "demo").unwrap();
        let before = record.updated_at;

        let updated = store
            .update(
                &record.id,
                ArticleUpdate { title: Some("X".to_string()), ..Default::default() },
            )
            .unwrap();

        assert_eq!(updated.title, "X");
        assert_eq!(updated.subtitle, "sub");
        assert_eq!(updated.markdown, "## Body\nText.");
        assert_eq!(updated.tags, vec!["Rust", "Programming"]);
        assert_eq!(updated.created_at, record.created_at);
        assert!(updated.updated_at > before);
    }

    #[test]
    fn test_identical_content_still_bumps_timestamp() {
        let (_dir, store) = store();
        let record = store.create(draft("Same"), "demo").unwrap();

        let first = store
            .update(
                &record.id,
                ArticleUpdate { title: Some("Same".to_string()), ..Default::default() },
            )
            .unwrap();
        let second = store
            .update(
                &record.id,
                ArticleUpdate { title: Some("Same".to_string()), ..Default::default() },
            )
            .unwrap();

        assert!(second.updated_at > first.updated_at);
    }

    #[test]
    fn test_empty_update_rejected() {
        let (_dir, store) = store();
        let record = store.create(draft("A"), "demo").unwrap();
        let err = store.update(&record.id, ArticleUpdate::default()).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidInput(_)));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store
            .update("ghost", ArticleUpdate { title: Some("X".to_string()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[test]
    fn test_list_newest_updated_first() {
        let (_dir, store) = store();
        let older = store.create(draft("A"), "demo").unwrap();
        let newer = store.create(draft("B"), "demo").unwrap();

        let items = store.list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, newer.id);
        assert_eq!(items[1].id, older.id);

        // Touching the older article moves it to the front.
        store
            .update(
                &older.id,
                ArticleUpdate { subtitle: Some("touched".to_string()), ..Default::default() },
            )
            .unwrap();
        let items = store.list();
        assert_eq!(items[0].id, older.id);
    }

    #[test]
    fn test_delete_then_get_and_redelete() {
        let (_dir, store) = store();
        let record = store.create(draft("Gone"), "demo").unwrap();

        store.delete(&record.id).unwrap();
        assert!(matches!(store.get(&record.id), Err(WorkflowError::NotFound(_))));
        assert!(matches!(store.delete(&record.id), Err(WorkflowError::NotFound(_))));
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        let id = {
            let store = ArticleStore::open(path.clone()).unwrap();
            store.create(draft("Durable"), "demo").unwrap().id
        };

        let reopened = ArticleStore::open(path).unwrap();
        let fetched = reopened.get(&id).unwrap();
        assert_eq!(fetched.title, "Durable");
        assert_eq!(reopened.count(), 1);
    }
}
