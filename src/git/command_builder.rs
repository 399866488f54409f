//! Type-safe Git command builder for consistent command execution
//!
//! This module provides a fluent API for building and executing Git commands,
//! so every query the release tool makes shares timeout handling, `-c`
//! configuration injection, logging and error mapping.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::GIT_QUERY_TIMEOUT;
use crate::core::ReleaseError;
use crate::utils::platform::get_git_command;

/// Type-safe builder for constructing and executing Git commands.
///
/// # Examples
///
/// ```rust,no_run
/// use release_tool::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let log = GitCommand::log_oneline("v1.0.0..HEAD")
///     .config("mailmap.file", "/repo/.mailmap")
///     .current_dir("/repo")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: 5 minutes
/// - **Working directory**: current process directory
/// - **Output**: captured
pub struct GitCommand {
    /// Command arguments to pass to Git (e.g., ["log", "--oneline", "a..b"])
    args: Vec<String>,

    /// `-c key=value` pairs placed before the subcommand
    configs: Vec<(String, String)>,

    /// Working directory for command execution (defaults to current directory)
    current_dir: Option<std::path::PathBuf>,

    /// Maximum duration to wait for command completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages
    context: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            configs: Vec::new(),
            current_dir: None,
            timeout_duration: Some(GIT_QUERY_TIMEOUT),
            context: None,
        }
    }
}

impl GitCommand {
    /// Creates a new Git command builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory for Git command execution.
    ///
    /// The directory is passed with `-C`, which keeps git independent of the
    /// process working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds multiple arguments to the Git command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds a `-c key=value` configuration override for this invocation only.
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configs.push((key.into(), value.into()));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (e.g., dependency name)
    ///
    /// With context, log messages include the identifier:
    /// ```text
    /// (github.com/foo/bar) Executing command: git ls-remote https://github.com/foo/bar v1.0.0 v1.0.0^{}
    /// ```
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Full argument list as passed to the git executable.
    fn full_args(&self) -> Vec<String> {
        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        for (key, value) in &self.configs {
            full_args.push("-c".to_string());
            full_args.push(format!("{key}={value}"));
        }
        full_args.extend(self.args.iter().cloned());
        full_args
    }

    /// The subcommand name, used for error reporting.
    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Execute the command and return the output
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let full_args = self.full_args();
        let operation = self.operation();

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        if let Some(ref ctx) = self.context {
            tracing::debug!(
                target: "git",
                "({}) Executing command: {} {}",
                ctx,
                git_command,
                full_args.join(" ")
            );
        } else {
            tracing::debug!(
                target: "git",
                "Executing command: {} {}",
                git_command,
                full_args.join(" ")
            );
        }

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        anyhow::Error::from(ReleaseError::GitNotFound)
                    } else {
                        anyhow::Error::from(e)
                            .context(format!("Failed to execute git {}", full_args.join(" ")))
                    }
                })?
            } else {
                tracing::warn!(
                    target: "git",
                    "Command timed out after {} seconds: git {}",
                    duration.as_secs(),
                    full_args.join(" ")
                );
                return Err(ReleaseError::GitCommandError {
                    operation,
                    stderr: format!(
                        "Git command timed out after {} seconds. Try running the command manually: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    ),
                }
                .into());
            }
        } else {
            output_future
                .await
                .context(format!("Failed to execute git {}", full_args.join(" ")))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);

            tracing::debug!(
                target: "git",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "Error: {}", stderr.trim());
            }

            return Err(ReleaseError::GitCommandError {
                operation,
                stderr: if stderr.is_empty() {
                    stdout.to_string()
                } else {
                    stderr.to_string()
                },
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            if let Some(ref ctx) = self.context {
                tracing::trace!(target: "git", "({}) {}", ctx, stderr.trim());
            } else {
                tracing::trace!(target: "git", "{}", stderr.trim());
            }
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            if let Some(ref ctx) = self.context {
                tracing::info!(target: "git::perf", "({}) Git {} took {:.2}s", ctx, operation, elapsed.as_secs_f64());
            } else {
                tracing::info!(target: "git::perf", "Git {} took {:.2}s", operation, elapsed.as_secs_f64());
            }
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "git::perf", "Git {} took {}ms", operation, elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout as a trimmed string
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command and check for success
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a Git command
#[derive(Debug)]
pub struct GitCommandOutput {
    /// Standard output from the Git command
    pub stdout: String,
    /// Standard error output from the Git command
    pub stderr: String,
}

// Convenience builders for the queries the release tool makes

impl GitCommand {
    /// `git show <rev>:<path>`
    pub fn show_file(revision: &str, path: &str) -> Self {
        Self::new().args(["show".to_string(), format!("{revision}:{path}")])
    }

    /// `git cat-file -e <rev>:<path>`; fails when the path is absent.
    pub fn file_exists(revision: &str, path: &str) -> Self {
        Self::new().args(["cat-file".to_string(), "-e".to_string(), format!("{revision}:{path}")])
    }

    /// `git log --oneline <range>`
    pub fn log_oneline(range: &str) -> Self {
        Self::new().args(["log", "--oneline", range])
    }

    /// `git log --format=%aE %aN <range>`
    pub fn log_authors(range: &str) -> Self {
        Self::new().args(["log", "--format=%aE %aN", range])
    }

    /// `git tag -l --sort=creatordate <pattern>`
    pub fn list_tags_sorted(pattern: &str) -> Self {
        Self::new().args(["tag", "-l", "--sort=creatordate", pattern])
    }

    /// Create a rev-parse command
    pub fn rev_parse(ref_name: &str) -> Self {
        Self::new().args(["rev-parse", ref_name])
    }

    /// Create a command to verify a reference names a commit
    pub fn verify_commit(ref_name: &str) -> Self {
        Self::new().args([
            "rev-parse".to_string(),
            "--verify".to_string(),
            "--quiet".to_string(),
            format!("{ref_name}^{{commit}}"),
        ])
    }

    /// `git ls-remote <url> <ref> <ref>^{}`
    ///
    /// Asks for both the ref and its peeled form so annotated tags resolve to
    /// the commit they point at.
    pub fn ls_remote_ref(url: &str, reference: &str) -> Self {
        Self::new().args([
            "ls-remote".to_string(),
            url.to_string(),
            reference.to_string(),
            format!("{reference}^{{}}"),
        ])
    }

    /// Create a clone command
    pub fn clone(url: &str, target: impl AsRef<Path>) -> Self {
        Self::new().args([
            "clone".to_string(),
            url.to_string(),
            target.as_ref().display().to_string(),
        ])
    }

    /// `git fetch origin`
    pub fn fetch_origin() -> Self {
        Self::new().args(["fetch", "origin"])
    }
}
