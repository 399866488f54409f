//! Common test utilities and fixtures for release-tool integration tests
//!
//! A [`TestProject`] owns a temporary directory holding the project
//! repository, sibling dependency repositories, release files and a cache
//! directory, and runs the compiled binary against them.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use release_tool::test_utils::TestGit;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test project builder for creating release environments
pub struct TestProject {
    _temp_dir: TempDir,
    project_dir: PathBuf,
    deps_dir: PathBuf,
    releases_dir: PathBuf,
    cache_dir: PathBuf,
    pub git: TestGit,
}

impl TestProject {
    /// Creates an initialized, empty project repository
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let deps_dir = temp_dir.path().join("deps");
        let releases_dir = temp_dir.path().join("releases");
        let cache_dir = temp_dir.path().join("cache");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&deps_dir)?;
        fs::create_dir_all(&releases_dir)?;
        fs::create_dir_all(&cache_dir)?;

        let git = TestGit::new(&project_dir);
        git.init()?;
        git.config_user()?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            deps_dir,
            releases_dir,
            cache_dir,
            git,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_dir
    }

    /// Writes `content` to `path` in the project and commits everything
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Result<()> {
        self.git.write_file(path, content)?;
        self.git.commit_all(message)
    }

    /// Creates a dependency repository next to the project
    pub fn create_dep_repo(&self, name: &str) -> Result<TestDepRepo> {
        let path = self.deps_dir.join(name);
        fs::create_dir_all(&path)?;

        let git = TestGit::new(&path);
        git.init()?;
        git.config_user()?;

        Ok(TestDepRepo {
            path,
            git,
        })
    }

    /// Writes a release file and returns its path
    pub fn write_release(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.releases_dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write release file {}", path.display()))?;
        Ok(path)
    }

    /// Runs the release tool from the project directory
    pub fn run_release(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_release-tool");
        let output = Command::new(binary)
            .args(args)
            .current_dir(&self.project_dir)
            .env_remove("RELEASE_TOOL_CACHE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run release-tool")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Dependency repository helper
pub struct TestDepRepo {
    pub path: PathBuf,
    pub git: TestGit,
}

impl TestDepRepo {
    /// Commits a file change as the given author and returns the full hash
    pub fn commit_as(&self, file: &str, content: &str, message: &str, name: &str, email: &str) -> Result<String> {
        self.git.write_file(file, content)?;
        self.git.add_all()?;
        self.git.commit_as(message, name, email)?;
        self.git.rev_parse_head()
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(self.success, "Command failed with code {:?}\nStderr: {}", self.code, self.stderr);
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }
}
