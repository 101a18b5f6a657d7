//! Runtime configuration.
//!
//! Loaded from environment variables, with an optional `.env` file picked
//! up from the working directory. Everything has a usable default so the
//! tool runs with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default per-call generation timeout. Gateway calls routinely take tens
/// of seconds to minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Runtime configuration for devstory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-call timeout for generation gateway calls.
    pub generation_timeout: Duration,

    /// Directory holding the article history file.
    pub data_dir: PathBuf,

    /// Name or path of the external Claude Code CLI binary.
    pub claude_bin: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn load() -> Self {
        // Missing .env is fine; only explicit values override defaults.
        let _ = dotenvy::dotenv();

        let generation_timeout = std::env::var("DEVSTORY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        let data_dir = std::env::var("DEVSTORY_DATA_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let claude_bin = std::env::var("DEVSTORY_CLAUDE_BIN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "claude".to_string());

        Self { generation_timeout, data_dir, claude_bin }
    }

    /// Path of the article history file inside the data directory.
    pub fn articles_path(&self) -> PathBuf {
        self.data_dir.join("articles.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: default_data_dir(),
            claude_bin: "claude".to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".devstory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.claude_bin, "claude");
        assert!(config.articles_path().ends_with("articles.json"));
    }

    #[test]
    fn test_articles_path_uses_data_dir() {
        let config = Config { data_dir: PathBuf::from("/tmp/devstory-test"), ..Config::default() };
        assert_eq!(config.articles_path(), PathBuf::from("/tmp/devstory-test/articles.json"));
    }
}
