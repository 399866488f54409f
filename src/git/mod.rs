//! Read-only git access for release note generation
//!
//! The release tool never mutates the project repository. Everything it needs
//! (manifest contents at a revision, logs between revisions, tag listings,
//! author lists and remote ref listings) comes from the system `git` binary
//! through [`command_builder::GitCommand`].
//!
//! Global options such as `mailmap.file` are carried by a [`GitOptions`] value
//! handed to [`GitRepo::with_options`] and injected as `-c key=value` pairs on
//! every invocation.
//!
//! # Example
//!
//! ```rust,no_run
//! use release_tool::git::{GitOptions, GitRepo};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GitRepo::with_options(".", GitOptions::new().mailmap(".mailmap"));
//! let log = repo.log_oneline("v1.0.0", "HEAD").await?;
//! println!("{log}");
//! # Ok(())
//! # }
//! ```

pub mod command_builder;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::{GIT_CLONE_TIMEOUT, GIT_FETCH_TIMEOUT, GIT_REMOTE_TIMEOUT};
use crate::core::ReleaseError;
use crate::utils::platform::get_git_command;
use command_builder::GitCommand;

/// Per-invocation `-c key=value` settings applied to every git command a
/// [`GitRepo`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOptions {
    config: Vec<(String, String)>,
}

impl GitOptions {
    /// Empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `mailmap.file` at the given path.
    #[must_use]
    pub fn mailmap(mut self, path: impl AsRef<Path>) -> Self {
        self.config.push(("mailmap.file".to_string(), path.as_ref().display().to_string()));
        self
    }

    fn apply(&self, mut cmd: GitCommand) -> GitCommand {
        for (key, value) in &self.config {
            cmd = cmd.config(key, value);
        }
        cmd
    }
}

/// A local git repository queried by path.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
    options: GitOptions,
}

impl GitRepo {
    /// Creates a handle for the repository at `path` without extra options.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_options(path, GitOptions::default())
    }

    /// Creates a handle whose commands all carry `options`.
    pub fn with_options(path: impl AsRef<Path>, options: GitOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }

    /// Repository working directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self, cmd: GitCommand) -> GitCommand {
        self.options.apply(cmd).current_dir(&self.path)
    }

    /// Returns true when `path` exists in the tree of `revision`.
    pub async fn file_exists(&self, revision: &str, path: &str) -> Result<bool> {
        let result = self
            .command(GitCommand::file_exists(revision, path))
            .execute_success()
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(e) => match e.downcast_ref::<ReleaseError>() {
                Some(ReleaseError::GitCommandError {
                    ..
                }) => Ok(false),
                _ => Err(e),
            },
        }
    }

    /// Contents of `path` at `revision` (`git show rev:path`).
    pub async fn show_file(&self, revision: &str, path: &str) -> Result<String> {
        let output = self
            .command(GitCommand::show_file(revision, path))
            .execute()
            .await
            .with_context(|| format!("Failed to read {path} at {revision}"))?;
        Ok(output.stdout)
    }

    /// Reads `path` at `revision` when it exists.
    pub async fn read_file(&self, revision: &str, path: &str) -> Result<Option<String>> {
        if !self.file_exists(revision, path).await? {
            return Ok(None);
        }
        self.show_file(revision, path).await.map(Some)
    }

    /// `git log --oneline` for `previous..commit`, or all history reachable
    /// from `commit` when `previous` is empty.
    pub async fn log_oneline(&self, previous: &str, commit: &str) -> Result<String> {
        let range = revision_range(previous, commit);
        self.command(GitCommand::log_oneline(&range))
            .execute()
            .await
            .map(|output| output.stdout)
            .with_context(|| format!("Failed to read log for {range}"))
    }

    /// Author email and name per commit in the range, one `email name` per line.
    pub async fn log_authors(&self, previous: &str, commit: &str) -> Result<String> {
        let range = revision_range(previous, commit);
        self.command(GitCommand::log_authors(&range))
            .execute()
            .await
            .map(|output| output.stdout)
            .with_context(|| format!("Failed to read authors for {range}"))
    }

    /// Tags matching a glob pattern, oldest first by creator date.
    pub async fn tags_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let stdout = self.command(GitCommand::list_tags_sorted(pattern)).execute_stdout().await?;
        Ok(stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
    }

    /// Full hash of a reference.
    pub async fn rev_parse(&self, reference: &str) -> Result<String> {
        self.command(GitCommand::rev_parse(reference))
            .execute_stdout()
            .await
            .with_context(|| format!("Failed to resolve {reference}"))
    }

    /// Returns true when `reference` names a commit in this repository.
    pub async fn has_commit(&self, reference: &str) -> Result<bool> {
        match self.command(GitCommand::verify_commit(reference)).execute_success().await {
            Ok(()) => Ok(true),
            Err(e) => match e.downcast_ref::<ReleaseError>() {
                Some(ReleaseError::GitCommandError {
                    ..
                }) => Ok(false),
                _ => Err(e),
            },
        }
    }

    /// Refreshes `origin`.
    pub async fn fetch(&self) -> Result<()> {
        self.command(GitCommand::fetch_origin())
            .with_timeout(Some(GIT_FETCH_TIMEOUT))
            .with_context(self.path.display().to_string())
            .execute_success()
            .await
    }

    /// Clones `url` into `target` and returns a handle sharing `options`.
    pub async fn clone_into(url: &str, target: impl AsRef<Path>, options: GitOptions) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone(url, target)
            .with_timeout(Some(GIT_CLONE_TIMEOUT))
            .with_context(url)
            .execute_success()
            .await
            .with_context(|| format!("Failed to clone {url}"))?;
        Ok(Self::with_options(target, options))
    }
}

/// Raw `git ls-remote <url> <ref> <ref>^{}` output.
///
/// Runs outside any repository, so no working directory or options apply.
pub async fn ls_remote(url: &str, reference: &str) -> Result<String> {
    GitCommand::ls_remote_ref(url, reference)
        .with_timeout(Some(GIT_REMOTE_TIMEOUT))
        .with_context(url)
        .execute()
        .await
        .map(|output| output.stdout)
}

fn revision_range(previous: &str, commit: &str) -> String {
    if previous.is_empty() {
        commit.to_string()
    } else {
        format!("{previous}..{commit}")
    }
}

/// Checks if Git is installed and accessible on the system.
pub fn is_git_installed() -> bool {
    std::process::Command::new(get_git_command())
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Ensures Git is available on the system or returns a detailed error.
pub fn ensure_git_available() -> Result<()> {
    if !is_git_installed() {
        return Err(ReleaseError::GitNotFound.into());
    }
    Ok(())
}
