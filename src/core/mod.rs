//! Core runtime pieces: configuration, session registry, article store.

pub mod config;
pub mod session;
pub mod store;

pub use config::Config;
pub use session::{Session, SessionManager, SessionStage};
pub use store::ArticleStore;
