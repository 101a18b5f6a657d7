//! # Devstory
//!
//! Turn a code project into a publishable Medium article.
//!
//! Devstory scans a local directory or a remote git repository, asks the
//! Claude Code CLI for story-driven topic ideas, writes a full article for
//! the chosen topic, and keeps every generated article in a local history
//! store for later revision, title tuning, tag suggestions and social
//! sharing posts.
//!
//! ## Quick Start
//!
//! ```bash
//! # Full pipeline on the current project
//! devstory run .
//!
//! # Serve the HTTP API for a frontend
//! devstory serve --port 8765
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod ai;
pub mod analyzer;
pub mod api;
pub mod core;
pub mod error;
pub mod workflow;

pub use ai::{ClaudeCli, Gateway, Generator};
pub use analyzer::{analyze_project, ProjectSummary};
pub use core::{ArticleStore, Config, SessionManager};
pub use error::{Result, WorkflowError};
pub use workflow::{ArticleRecord, Orchestrator, Topic};

/// Application version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const APP_NAME: &str = "devstory";
