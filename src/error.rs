//! Error taxonomy for the workflow core.
//!
//! Every fallible boundary operation resolves to one of these kinds so
//! that the CLI and HTTP layers can report a stable `kind` string next to
//! the human-readable message.

/// Errors surfaced by workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Malformed or out-of-range request. The caller must correct it;
    /// never retried automatically.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown or expired session. The caller must restart from analyze.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The project path or remote repository could not be reached.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The external generation capability errored or is not
    /// installed/authenticated. The underlying message is preserved
    /// verbatim so the operator can diagnose it.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// A caller-specified deadline expired before the generation call
    /// completed. No state was committed.
    #[error("generation timed out after {0}s")]
    Timeout(u64),

    /// An article or other stored resource is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage or serialization fault outside the request-level taxonomy.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl WorkflowError {
    /// Stable machine-readable kind string for error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::SessionNotFound(_) => "session_not_found",
            Self::SourceUnavailable(_) => "source_unavailable",
            Self::GenerationFailed(_) => "generation_failed",
            Self::Timeout(_) => "timeout",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_are_stable() {
        assert_eq!(WorkflowError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(WorkflowError::SessionNotFound("x".into()).kind(), "session_not_found");
        assert_eq!(WorkflowError::Timeout(30).kind(), "timeout");
        assert_eq!(WorkflowError::GenerationFailed("x".into()).kind(), "generation_failed");
    }

    #[test]
    fn test_generation_failure_preserves_message() {
        let err = WorkflowError::GenerationFailed("claude CLI failed (exit 1): boom".into());
        assert!(err.to_string().contains("claude CLI failed (exit 1): boom"));
    }
}
