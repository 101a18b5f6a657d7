//! Project source resolution.
//!
//! A workflow can start from a local directory or a remote git URL. Remote
//! sources get a shallow clone into a temp directory that lives as long as
//! the owning session, so analysis and later article writing see the same
//! checkout.

use std::path::{Path, PathBuf};

use git2::build::RepoBuilder;
use git2::FetchOptions;
use tempfile::TempDir;

use crate::error::{Result, WorkflowError};

/// A resolved project source: either a caller-owned local directory or a
/// session-owned shallow clone.
#[derive(Debug)]
pub enum ProjectSource {
    Local(PathBuf),
    Cloned { dir: TempDir, checkout: PathBuf },
}

impl ProjectSource {
    /// The directory the analyzer should scan.
    pub fn path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Cloned { checkout, .. } => checkout,
        }
    }

    /// Take ownership of the clone's temp dir, if any, so a session can
    /// keep the checkout alive.
    pub fn into_clone_dir(self) -> Option<TempDir> {
        match self {
            Self::Local(_) => None,
            Self::Cloned { dir, .. } => Some(dir),
        }
    }
}

/// Whether the given source string names a remote git repository rather
/// than a local path.
pub fn is_remote_url(source: &str) -> bool {
    let remote_scheme = source.starts_with("https://")
        || source.starts_with("http://")
        || source.starts_with("git@");
    let known_host = source.contains("github.com")
        || source.contains("gitlab.com")
        || source.contains("bitbucket.org")
        || source.ends_with(".git");
    remote_scheme && known_host
}

/// Human-friendly project name for a source string: the last path segment
/// of a URL (sans `.git`) or the directory basename.
pub fn project_name(source: &str) -> String {
    let trimmed = source.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.trim_end_matches(".git").to_string()
}

/// Resolve a source string into a scannable directory, cloning remote
/// URLs shallowly.
pub fn resolve(source: &str) -> Result<ProjectSource> {
    if is_remote_url(source) {
        return clone_repo(source);
    }

    let path = PathBuf::from(source);
    if !path.is_dir() {
        // A bad local path is the caller's mistake, not an upstream fault.
        return Err(WorkflowError::InvalidInput(format!("path is not a directory: {source}")));
    }
    Ok(ProjectSource::Local(path))
}

fn clone_repo(url: &str) -> Result<ProjectSource> {
    let dir = TempDir::with_prefix("devstory-")
        .map_err(|e| WorkflowError::SourceUnavailable(format!("creating clone dir: {e}")))?;
    let checkout = dir.path().join("repo");

    tracing::info!(url, "cloning remote project");
    let mut fetch = FetchOptions::new();
    fetch.depth(1);
    RepoBuilder::new()
        .fetch_options(fetch)
        .clone(url, &checkout)
        .map_err(|e| WorkflowError::SourceUnavailable(format!("git clone failed: {e}")))?;

    Ok(ProjectSource::Cloned { dir, checkout })
}
