//! Session management.
//!
//! A session bridges the stateless analyze/topics/write calls of one
//! workflow instance. Sessions live in memory only, keyed by a random
//! UUID, with a bounded TTL so abandoned flows do not accumulate forever.
//!
//! The stage of the flow is an explicit enum rather than a set of
//! presence-checked fields, so an illegal transition (writing before
//! topics exist) cannot be expressed by accident.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tempfile::TempDir;
use uuid::Uuid;

use crate::analyzer::ProjectSummary;
use crate::error::{Result, WorkflowError};
use crate::workflow::article::Topic;

/// Idle time after which a session may be evicted.
pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Maximum number of live sessions kept at once.
pub const SESSION_CAPACITY: usize = 256;

/// Where a workflow instance currently stands.
#[derive(Debug)]
pub enum SessionStage {
    /// Analysis done; no topics generated yet.
    Analyzed,
    /// Topics generated and ready for selection. Re-generating topics
    /// replaces the list; writing does not consume it.
    TopicsReady(Vec<Topic>),
}

/// Per-workflow state: one analyzed project and its generated topics.
#[derive(Debug)]
pub struct Session {
    pub summary: ProjectSummary,
    pub stage: SessionStage,
    last_touched: Instant,
    /// Temp checkout of a cloned remote repo; removed when the session
    /// is dropped.
    _clone_dir: Option<TempDir>,
}

impl Session {
    fn new(summary: ProjectSummary, clone_dir: Option<TempDir>) -> Self {
        Self {
            summary,
            stage: SessionStage::Analyzed,
            last_touched: Instant::now(),
            _clone_dir: clone_dir,
        }
    }

    /// The generated topic list, if the session has reached that stage.
    pub fn topics(&self) -> Option<&[Topic]> {
        match &self.stage {
            SessionStage::TopicsReady(topics) => Some(topics),
            SessionStage::Analyzed => None,
        }
    }

    fn idle(&self) -> Duration {
        self.last_touched.elapsed()
    }

    fn touch(&mut self) {
        self.last_touched = Instant::now();
    }
}

/// Concurrent map of session id to session record.
///
/// The outer lock is held only long enough to look up or insert the
/// per-session `Arc`; each record carries its own lock, so long-running
/// work on one session never blocks another.
pub struct SessionManager {
    inner: RwLock<HashMap<String, Arc<RwLock<Session>>>>,
    ttl: Duration,
    capacity: usize,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_limits(SESSION_TTL, SESSION_CAPACITY)
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self { inner: RwLock::new(HashMap::new()), ttl, capacity }
    }

    /// Create a session for a freshly analyzed project and return its id.
    pub fn create(&self, summary: ProjectSummary, clone_dir: Option<TempDir>) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(RwLock::new(Session::new(summary, clone_dir)));

        let mut map = self.inner.write();
        Self::sweep(&mut map, self.ttl, self.capacity);
        map.insert(id.clone(), session);
        id
    }

    /// Look up a session, refreshing its idle timer.
    pub fn get(&self, id: &str) -> Result<Arc<RwLock<Session>>> {
        let session = self
            .inner
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::SessionNotFound(id.to_string()))?;
        session.write().touch();
        Ok(session)
    }

    /// Replace the session's topic list, advancing it to `TopicsReady`.
    pub fn put_topics(&self, id: &str, topics: Vec<Topic>) -> Result<()> {
        let session = self.get(id)?;
        session.write().stage = SessionStage::TopicsReady(topics);
        Ok(())
    }

    /// Clone of the cached project summary for a session.
    pub fn get_summary(&self, id: &str) -> Result<ProjectSummary> {
        let session = self.get(id)?;
        let summary = session.read().summary.clone();
        Ok(summary)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop expired sessions; if still over capacity, drop the most idle.
    fn sweep(map: &mut HashMap<String, Arc<RwLock<Session>>>, ttl: Duration, capacity: usize) {
        map.retain(|_, session| session.read().idle() < ttl);

        if map.len() >= capacity {
            let mut by_idle: Vec<(String, Duration)> =
                map.iter().map(|(id, s)| (id.clone(), s.read().idle())).collect();
            by_idle.sort_by_key(|(_, idle)| std::cmp::Reverse(*idle));

            let excess = map.len() + 1 - capacity;
            for (id, _) in by_idle.into_iter().take(excess) {
                map.remove(&id);
                tracing::debug!(session = %id, "evicted idle session at capacity");
            }
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_summary(name: &str) -> ProjectSummary {
        ProjectSummary {
            name: name.to_string(),
            total_files: 3,
            total_lines: 42,
            primary_language: Some("Rust".to_string()),
            languages: Default::default(),
            project_types: Vec::new(),
            frameworks: Vec::new(),
            dependencies: Vec::new(),
            readme_excerpt: String::new(),
            prompt_context: "ctx".to_string(),
        }
    }

    fn dummy_topic(title: &str) -> Topic {
        Topic {
            title: title.to_string(),
            hook: String::new(),
            angle: String::new(),
            target_audience: String::new(),
            estimated_sections: Vec::new(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let manager = SessionManager::new();
        let id = manager.create(dummy_summary("proj"), None);

        let summary = manager.get_summary(&id).unwrap();
        assert_eq!(summary.name, "proj");
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let manager = SessionManager::new();
        let err = manager.get("no-such-id").unwrap_err();
        assert!(matches!(err, WorkflowError::SessionNotFound(_)));
    }

    #[test]
    fn test_stage_advances_with_topics() {
        let manager = SessionManager::new();
        let id = manager.create(dummy_summary("proj"), None);

        {
            let session = manager.get(&id).unwrap();
            assert!(session.read().topics().is_none());
        }

        manager.put_topics(&id, vec![dummy_topic("a"), dummy_topic("b")]).unwrap();

        let session = manager.get(&id).unwrap();
        let guard = session.read();
        let topics = guard.topics().unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "a");
    }

    #[test]
    fn test_topics_overwrite_previous_list() {
        let manager = SessionManager::new();
        let id = manager.create(dummy_summary("proj"), None);

        manager.put_topics(&id, vec![dummy_topic("old")]).unwrap();
        manager.put_topics(&id, vec![dummy_topic("new1"), dummy_topic("new2")]).unwrap();

        let session = manager.get(&id).unwrap();
        let guard = session.read();
        let topics = guard.topics().unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "new1");
    }

    #[test]
    fn test_distinct_ids_per_create() {
        let manager = SessionManager::new();
        let a = manager.create(dummy_summary("a"), None);
        let b = manager.create(dummy_summary("b"), None);
        assert_ne!(a, b);
        assert_eq!(manager.get_summary(&a).unwrap().name, "a");
        assert_eq!(manager.get_summary(&b).unwrap().name, "b");
    }

    #[test]
    fn test_ttl_eviction_on_create() {
        let manager = SessionManager::with_limits(Duration::from_millis(0), 16);
        let id = manager.create(dummy_summary("stale"), None);
        // Zero TTL: the next create sweeps everything already present.
        let _ = manager.create(dummy_summary("fresh"), None);
        assert!(manager.get(&id).is_err());
    }

    #[test]
    fn test_capacity_bound() {
        let manager = SessionManager::with_limits(Duration::from_secs(3600), 4);
        for i in 0..10 {
            manager.create(dummy_summary(&format!("p{i}")), None);
        }
        assert!(manager.len() <= 4);
    }
}
