//! Release file schema
//!
//! One TOML file per release, conventionally named after the tag:
//!
//! ```toml
//! # releases/v1.7.0.toml
//! project_name = "containerd"
//! github_repo = "containerd/containerd"
//! commit = "HEAD"
//! previous = "v1.6.0"
//! pre_release = false
//!
//! preface = """
//! The seventh major release of containerd.
//! """
//!
//! match_deps = "^github.com/(containerd/[a-zA-Z0-9-]+)$"
//! ignore_deps = ["github.com/containerd/containerd"]
//!
//! [notes.sandbox]
//! title = "Sandbox API"
//! description = "A new API for managing sandboxes."
//!
//! [breaking.cri]
//! commit = "abcdef0"
//! description = "Removed CRI v1alpha2"
//!
//! [rename_deps.ttrpc]
//! old = "github.com/stevvooe/ttrpc"
//! new = "github.com/containerd/ttrpc"
//!
//! [make_deps.runc]
//! variable = "RUNC_VERSION"
//! repository = "github.com/opencontainers/runc"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::parse_config;
use crate::changelog::Change;
use crate::core::ReleaseError;

/// Highlighted release note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Module path rename applied to the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRename {
    pub old: String,
    pub new: String,
}

/// Dependency version read from a Makefile variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeDependency {
    pub variable: String,
    pub repository: String,
}

/// Contents of a release file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    pub project_name: String,
    pub github_repo: String,
    pub commit: String,
    pub previous: String,
    pub pre_release: bool,
    pub preface: String,
    pub notes: BTreeMap<String, Note>,
    #[serde(rename = "breaking")]
    pub breaking_changes: BTreeMap<String, Change>,
    pub release_date: String,

    /// Regex selecting updated dependencies that get their own changelog.
    pub match_deps: String,
    pub rename_deps: BTreeMap<String, ProjectRename>,
    pub ignore_deps: Vec<String>,
    pub make_deps: BTreeMap<String, MakeDependency>,
}

impl ReleaseConfig {
    /// Loads a release file, reporting a missing file distinctly.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReleaseError::ReleaseFileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let mut config: Self = parse_config(path)?;
        config.preface = config.preface.trim_end().to_string();
        Ok(config)
    }
}

/// Tag implied by a release file name: `releases/v1.2.3.toml` → `v1.2.3`.
pub fn tag_from_path(path: &Path) -> String {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    file_name.strip_suffix(".toml").map(str::to_string).unwrap_or(file_name)
}
