//! Claude Code CLI integration.
//!
//! Implements the Generator trait by shelling out to the locally
//! installed `claude` binary in print mode. The user message is piped on
//! stdin so prompt size is not limited by argv.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{GenerateError, Generator};

/// Generator backed by the Claude Code CLI subprocess.
pub struct ClaudeCli {
    binary: String,
}

impl ClaudeCli {
    /// Create a provider for the given binary name or path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    /// Resolve the binary in PATH; `None` when not installed.
    pub fn locate(&self) -> Option<std::path::PathBuf> {
        which::which(&self.binary).ok()
    }

    fn not_installed(&self) -> GenerateError {
        GenerateError::NotInstalled(format!(
            "Claude Code CLI ('{}') not found. This tool requires Claude Code to be installed \
             and authenticated. Install it with `npm install -g @anthropic-ai/claude-code`, \
             then run `claude` once to authenticate.",
            self.binary
        ))
    }
}

#[async_trait]
impl Generator for ClaudeCli {
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, GenerateError> {
        let Some(binary) = self.locate() else {
            return Err(self.not_installed());
        };

        let mut cmd = Command::new(binary);
        cmd.arg("-p")
            .arg("--system-prompt")
            .arg(system_prompt)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Nested invocations refuse to start when this is set.
            .env_remove("CLAUDECODE")
            // Dropping the future (timeout) must not leave the child running.
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                self.not_installed()
            } else {
                GenerateError::Process(format!("failed to spawn claude CLI: {e}"))
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(user_message.as_bytes())
                .await
                .map_err(|e| GenerateError::Process(format!("writing to claude stdin: {e}")))?;
            // Close stdin so the CLI sees EOF and starts generating.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GenerateError::Process(format!("waiting for claude CLI: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            let lowered = stderr.to_lowercase();
            if lowered.contains("not authenticated") || lowered.contains("login") {
                return Err(GenerateError::NotAuthenticated(
                    "Claude Code CLI is installed but not authenticated. Run `claude` in your \
                     terminal to log in, then try again."
                        .to_string(),
                ));
            }
            return Err(GenerateError::Process(format!(
                "claude CLI failed (exit {}): {stderr}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(GenerateError::EmptyOutput(format!(
                "claude CLI returned empty output; stderr: {stderr}"
            )));
        }

        Ok(stdout)
    }

    fn name(&self) -> &str {
        "claude-cli"
    }

    fn is_available(&self) -> bool {
        self.locate().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_reports_not_installed() {
        let provider = ClaudeCli::new("definitely-not-a-real-binary-1b9c");
        assert!(!provider.is_available());
        assert!(provider.locate().is_none());
    }

    #[tokio::test]
    async fn test_generate_against_missing_binary() {
        let provider = ClaudeCli::new("definitely-not-a-real-binary-1b9c");
        let err = provider.generate("system", "user").await.unwrap_err();
        assert!(matches!(err, GenerateError::NotInstalled(_)));
        assert!(err.to_string().contains("not found"));
    }
}
