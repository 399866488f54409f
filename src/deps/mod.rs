//! Dependency extraction and version diffing
//!
//! This module turns the dependency manifests of a project at two revisions into
//! the list of dependencies that changed between them.
//!
//! # Pipeline
//!
//! 1. [`parse_dependencies`] probes the supported [`ManifestFormat`]s at a
//!    revision in priority order and parses the first one present, then appends
//!    any versions read from Makefile variables ([`make_vars`]).
//! 2. [`diff::rename_dependencies`] rewrites renamed modules in the previous
//!    snapshot so they match their new names.
//! 3. [`diff::updated_dependencies`] compares both snapshots, resolving commits
//!    remotely ([`remote`], [`origin`]) only when declared versions differ.
//!
//! # Manifest formats
//!
//! | Format | File | Shape |
//! |--------|------|-------|
//! | [`ManifestFormat::VendorConf`] | `vendor.conf` | `name commitOrVersion [gitURL]` |
//! | [`ManifestFormat::ModulesTxt`] | `vendor/modules.txt` | `# module version [=> module version]` |
//! | [`ManifestFormat::GoMod`] | `go.mod` | `require` / `replace` directives |

pub mod diff;
pub mod go_mod;
pub mod make_vars;
pub mod modules_txt;
pub mod origin;
pub mod remote;
pub mod vendor_conf;
pub mod version;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::config::MakeDependency;
use crate::constants::{GO_MOD, MODULES_TXT, VENDOR_CONF};
use crate::core::ReleaseError;
use crate::git::GitRepo;
use version::NormalizedVersion;

/// One external module at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Canonical module path, e.g. `github.com/org/repo`.
    pub name: String,
    /// Version as declared in the manifest.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Commit hash, at most 12 characters; empty when unresolved.
    pub sha: String,
    /// Declared version in the previous snapshot, set only on updates.
    pub previous: String,
    /// Clone URL; empty until resolved.
    pub git_url: String,
}

impl Dependency {
    /// Builds a dependency from a normalized version, filling the clone URL
    /// from the well-known host rules.
    pub fn from_version(name: impl Into<String>, version: NormalizedVersion) -> Self {
        let name = name.into();
        let sha = if version.is_commit {
            version.value.clone()
        } else {
            String::new()
        };
        Self {
            git_url: origin::known_git_url(&name).unwrap_or_default(),
            name,
            reference: version.value,
            sha,
            previous: String::new(),
        }
    }
}

/// Dependencies keyed by name, in first-seen order.
///
/// Inserting a name that is already present replaces the record in place, so
/// the position of the first occurrence is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: Vec<Dependency>,
    index: HashMap<String, usize>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for `dep.name`.
    pub fn insert(&mut self, dep: Dependency) {
        if let Some(&idx) = self.index.get(&dep.name) {
            self.entries[idx] = dep;
        } else {
            self.index.insert(dep.name.clone(), self.entries.len());
            self.entries.push(dep);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    /// Mutable access for in-place enrichment. The name must not be changed
    /// through this reference; use [`DependencySet::rename`].
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Dependency> {
        self.index.get(name).map(|&idx| &mut self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    /// Renames entries in one pass using `renames` (old name to new name).
    ///
    /// Every new name is looked up against the names as they were before the
    /// call, so each entry is renamed at most once and chains or swaps do not
    /// cascade. When two entries end up with the same name, the one later in
    /// the set wins and takes the position of the first. Returns the number
    /// of entries renamed.
    pub fn rename_all(&mut self, renames: &HashMap<&str, &str>) -> usize {
        let mut renamed = 0;
        let entries = std::mem::take(&mut self.entries);
        self.index.clear();

        for mut dep in entries {
            if let Some(&new) = renames.get(dep.name.as_str())
                && new != dep.name
            {
                dep.name = new.to_string();
                renamed += 1;
            }
            self.insert(dep);
        }
        renamed
    }

    /// Appends every dependency of `other`, replacing same-named records.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Dependency>) {
        for dep in other {
            self.insert(dep);
        }
    }

    pub fn into_vec(self) -> Vec<Dependency> {
        self.entries
    }

}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for DependencySet {
    type Item = Dependency;
    type IntoIter = std::vec::IntoIter<Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Supported dependency manifest formats, in probing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Legacy pinned-commit list.
    VendorConf,
    /// Lockfile-style module list written by `go mod vendor`.
    ModulesTxt,
    /// Module declaration file.
    GoMod,
}

impl ManifestFormat {
    /// Probing order.
    pub const ALL: [Self; 3] = [Self::VendorConf, Self::ModulesTxt, Self::GoMod];

    /// Path of the manifest relative to the repository root.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::VendorConf => VENDOR_CONF,
            Self::ModulesTxt => MODULES_TXT,
            Self::GoMod => GO_MOD,
        }
    }

    /// Parses manifest contents into a dependency set.
    pub fn parse(self, content: &str) -> Result<DependencySet, ReleaseError> {
        match self {
            Self::VendorConf => vendor_conf::parse(content),
            Self::ModulesTxt => modules_txt::parse(content),
            Self::GoMod => go_mod::parse(content),
        }
    }
}

/// Reads the first manifest present at `revision` and parses it.
pub async fn parse_manifest(repo: &GitRepo, revision: &str) -> Result<(ManifestFormat, DependencySet)> {
    for format in ManifestFormat::ALL {
        let Some(content) = repo.read_file(revision, format.file_name()).await? else {
            tracing::trace!("{} not present at {}", format.file_name(), revision);
            continue;
        };

        tracing::debug!("Parsing {} at {}", format.file_name(), revision);
        let deps = format
            .parse(&content)
            .with_context(|| format!("Failed to parse {} at {}", format.file_name(), revision))?;
        return Ok((format, deps));
    }

    Err(ReleaseError::ManifestNotFound {
        revision: revision.to_string(),
    }
    .into())
}

/// All dependencies declared at `revision`: the manifest entries followed by
/// versions read from Makefile variables.
pub async fn parse_dependencies(
    repo: &GitRepo,
    revision: &str,
    make_deps: &BTreeMap<String, MakeDependency>,
) -> Result<DependencySet> {
    let (_, mut deps) = parse_manifest(repo, revision).await?;
    let from_make = make_vars::parse_make_dependencies(repo, revision, make_deps).await?;
    deps.extend(from_make);
    Ok(deps)
}
