//! Release notes pipeline
//!
//! Drives one release run end to end:
//!
//! 1. load the release file and set up the cache
//! 2. collect the project changelog (and the changelog since the last tag of
//!    the same series) and its contributors
//! 3. parse dependencies at both revisions, apply renames and diff them
//! 4. for updated dependencies matching `match_deps`, clone them and collect
//!    their changelogs and contributors too
//! 5. render the notes through the template
//!
//! The project repository is only ever queried. Dependency clones live under
//! `<cache>/git` or a temporary directory that is removed afterwards.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cache::{Cache, DirCache, NoopCache};
use crate::changelog::{self, Change, Contributors, ProjectChange};
use crate::config::{Note, ReleaseConfig, tag_from_path};
use crate::core::ReleaseError;
use crate::deps::diff::{rename_dependencies, updated_dependencies};
use crate::deps::remote::{GitRemote, Resolver};
use crate::deps::{Dependency, parse_dependencies};
use crate::git::{GitOptions, GitRepo};
use crate::templating;

/// Inputs of a release run, usually built from command-line flags.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Release TOML file.
    pub release_file: PathBuf,
    /// Tag being released; defaults to the release file stem.
    pub tag: Option<String>,
    /// Template path.
    pub template: PathBuf,
    /// Link commits and pull requests to GitHub.
    pub linkify: bool,
    /// Use GitHub's `owner/repo@sha` autolinks for commits.
    pub gfm: bool,
    /// Cache root; `git/` and `object/` are created below it.
    pub cache_dir: Option<PathBuf>,
    /// Project repository.
    pub repo_dir: PathBuf,
}

/// Everything the template can see.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseNotes {
    pub project_name: String,
    pub github_repo: String,
    pub commit: String,
    pub previous: String,
    pub pre_release: bool,
    pub preface: String,
    pub notes: BTreeMap<String, Note>,
    pub breaking_changes: BTreeMap<String, Change>,
    pub release_date: String,
    pub tag: String,
    pub version: String,
    pub changes: Vec<ProjectChange>,
    pub contributors: Vec<String>,
    pub dependencies: Vec<Dependency>,
}

/// Cache backend plus the directory dependency clones go to.
struct CacheLayout {
    cache: Box<dyn Cache>,
    git_root: Option<PathBuf>,
}

impl CacheLayout {
    fn new(cache_dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = cache_dir else {
            return Ok(Self {
                cache: Box::new(NoopCache),
                git_root: None,
            });
        };

        let dir = std::path::absolute(dir)
            .with_context(|| format!("Failed to resolve cache dir {}", dir.display()))?;
        if !dir.is_dir() {
            return Err(ReleaseError::ConfigError {
                message: format!("unable to use cache dir: {} does not exist", dir.display()),
            }
            .into());
        }

        let git_root = dir.join("git");
        std::fs::create_dir_all(&git_root)
            .with_context(|| format!("unable to mkdir {}", git_root.display()))?;
        let cache = DirCache::new(dir.join("object"))?;
        tracing::debug!("Using cache at {}", dir.display());

        Ok(Self {
            cache: Box::new(cache),
            git_root: Some(git_root),
        })
    }
}

/// Version shown in notes: the tag without leading `v`s.
pub fn version_from_tag(tag: &str) -> String {
    tag.trim_start_matches('v').to_string()
}

/// Directory name for a matched dependency: the first capture group, or the
/// last path segment when the pattern has none.
pub fn matched_name(re: &Regex, dependency: &str) -> Option<String> {
    let caps = re.captures(dependency)?;
    let name = match caps.get(1) {
        Some(group) => group.as_str().to_string(),
        None => dependency.rsplit('/').next().unwrap_or(dependency).to_string(),
    };
    Some(name)
}

/// Runs the pipeline and returns the rendered release notes.
pub async fn generate(options: &ReleaseOptions) -> Result<String> {
    let layout = CacheLayout::new(options.cache_dir.as_deref())?;
    let release = ReleaseConfig::load(&options.release_file)?;
    let tag = options.tag.clone().unwrap_or_else(|| tag_from_path(&options.release_file));

    tracing::info!("Welcome to the {} release tool...", release.project_name);

    let mailmap = std::path::absolute(options.repo_dir.join(".mailmap"))
        .context("failed to resolve mailmap")?;
    let git_options = GitOptions::new().mailmap(mailmap);
    let repo = GitRepo::with_options(&options.repo_dir, git_options.clone());

    let mut contributors = Contributors::new();
    let mut project_changes = Vec::new();

    let mut changes = changelog::changelog(&repo, &release.previous, &release.commit).await?;
    if options.linkify {
        changelog::linkify(&repo, &mut changes, &release.github_repo, options.gfm).await?;
    }
    let change_count = changes.len();
    project_changes.push(ProjectChange {
        changes,
        ..Default::default()
    });

    let previous_tag = changelog::previous_tag(&repo, &tag).await?;
    if !previous_tag.is_empty() && previous_tag != release.previous && previous_tag != tag {
        let mut since_tag = changelog::changelog(&repo, &previous_tag, &release.commit).await?;
        if options.linkify {
            changelog::linkify(&repo, &mut since_tag, &release.github_repo, options.gfm).await?;
        }
        project_changes.push(ProjectChange {
            name: String::new(),
            since: previous_tag,
            changes: since_tag,
        });
    }

    contributors.add_range(&repo, &release.previous, &release.commit).await?;

    tracing::info!("creating new release {} with {} new changes...", tag, change_count);

    let mut current = parse_dependencies(&repo, &release.commit, &release.make_deps)
        .await
        .with_context(|| format!("Failed to parse dependencies at {}", release.commit))?;
    let mut previous = parse_dependencies(&repo, &release.previous, &release.make_deps)
        .await
        .with_context(|| format!("Failed to parse dependencies at {}", release.previous))?;

    rename_dependencies(&mut previous, &release.rename_deps);

    let remote = GitRemote::new()?;
    let resolver = Resolver::new(&remote, layout.cache.as_ref());
    let updated =
        updated_dependencies(&mut previous, &mut current, &release.ignore_deps, &resolver).await?;

    if !release.match_deps.is_empty() && !updated.is_empty() {
        let dep_changes = matched_dependency_changes(
            &release,
            &updated,
            layout.git_root.as_deref(),
            &git_options,
            options,
            &mut contributors,
        )
        .await?;
        project_changes.extend(dep_changes);
    }

    let release_date = if release.release_date.is_empty() {
        chrono::Utc::now().format("%Y-%m-%d").to_string()
    } else {
        release.release_date.clone()
    };

    let notes = ReleaseNotes {
        project_name: release.project_name,
        github_repo: release.github_repo,
        commit: release.commit,
        previous: release.previous,
        pre_release: release.pre_release,
        preface: release.preface,
        notes: release.notes,
        breaking_changes: release.breaking_changes,
        release_date,
        version: version_from_tag(&tag),
        tag,
        changes: project_changes,
        contributors: contributors.ordered_names(),
        dependencies: updated,
    };

    let template = templating::load_template(&options.template)?;
    templating::render(&template, &notes)
}

/// Clones (or refreshes) every updated dependency matching `match_deps` and
/// collects its changelog and contributors.
async fn matched_dependency_changes(
    release: &ReleaseConfig,
    updated: &[Dependency],
    git_root: Option<&Path>,
    git_options: &GitOptions,
    options: &ReleaseOptions,
    contributors: &mut Contributors,
) -> Result<Vec<ProjectChange>> {
    let re = Regex::new(&release.match_deps).map_err(|e| ReleaseError::ConfigError {
        message: format!("unable to compile 'match_deps' regexp: {e}"),
    })?;

    // Held until the function returns so the clones outlive their use.
    let scratch;
    let git_root = match git_root {
        Some(root) => root.to_path_buf(),
        None => {
            scratch = tempfile::Builder::new()
                .prefix("tmp-clone-")
                .tempdir()
                .context("unable to create temp clone directory")?;
            scratch.path().to_path_buf()
        }
    };

    let mut project_changes = Vec::new();
    for dep in updated {
        let Some(name) = matched_name(&re, &dep.name) else {
            continue;
        };
        tracing::debug!("Matched dependency {} with {}", dep.name, release.match_deps);

        let target = git_root.join(&name);
        let dep_repo = if target.exists() {
            let existing = GitRepo::with_options(&target, git_options.clone());
            if !existing.has_commit(&dep.reference).await? {
                tracing::debug!(name = %name, "git fetch origin");
                existing.fetch().await.with_context(|| format!("failed to fetch {name}"))?;
            }
            existing
        } else {
            tracing::debug!("git clone {} {}", dep.git_url, name);
            GitRepo::clone_into(&dep.git_url, &target, git_options.clone()).await?
        };

        let mut changes = changelog::changelog(&dep_repo, &dep.previous, &dep.reference)
            .await
            .with_context(|| format!("failed to get changelog for {name}"))?;
        contributors
            .add_range(&dep_repo, &dep.previous, &dep.reference)
            .await
            .with_context(|| format!("failed to get authors for {name}"))?;

        if options.linkify {
            match dep.name.strip_prefix("github.com/") {
                Some(github_name) => {
                    changelog::linkify(&dep_repo, &mut changes, github_name, options.gfm).await?;
                }
                None => {
                    tracing::debug!("linkify only supported for Github, skipping {}", dep.name);
                }
            }
        }

        project_changes.push(ProjectChange {
            name,
            since: String::new(),
            changes,
        });
    }

    Ok(project_changes)
}
