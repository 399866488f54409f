//! Commit history between two revisions
//!
//! Release notes list every commit between the previous release and the new
//! one, optionally linked to GitHub, plus a second list measured from the last
//! tag of the same series when that differs from `previous`.

pub mod contributors;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::git::GitRepo;

pub use contributors::Contributors;

static MERGE_PR: LazyLock<Regex> = LazyLock::new(|| {
    // Static pattern; compilation cannot fail.
    Regex::new("^Merge pull request #([0-9]+)").unwrap()
});

/// One commit in a changelog, or one entry of the `breaking` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub description: String,
}

/// A changelog section. The project itself has an empty name; matched
/// dependencies carry their short name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectChange {
    pub name: String,
    pub since: String,
    pub changes: Vec<Change>,
}

/// Parses `git log --oneline` output.
pub fn parse_changelog(raw: &str) -> Vec<Change> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let commit = fields.next()?;
            Some(Change {
                commit: commit.to_string(),
                description: fields.collect::<Vec<_>>().join(" "),
            })
        })
        .collect()
}

/// Commits in `previous..commit` (everything reachable from `commit` when
/// `previous` is empty).
pub async fn changelog(repo: &GitRepo, previous: &str, commit: &str) -> Result<Vec<Change>> {
    let raw = repo.log_oneline(previous, commit).await?;
    Ok(parse_changelog(&raw))
}

/// Most recently created tag in the same series as `tag`.
///
/// The series is the part of the tag before the first `-`, so `v1.7.0-rc.1`
/// looks at `v1.7.0*`. Returns an empty string when no tag matches.
pub async fn previous_tag(repo: &GitRepo, tag: &str) -> Result<String> {
    let prefix = tag.split('-').find(|f| !f.is_empty()).unwrap_or_default();
    let tags = repo.tags_matching(&format!("{prefix}*")).await?;
    Ok(tags.last().cloned().unwrap_or_default())
}

/// Link target for a commit: a markdown link, or GitHub's `owner/repo@sha`
/// autolink in GFM mode.
pub fn commit_link(short: &str, full: &str, github_repo: &str, gfm: bool) -> String {
    if gfm {
        format!("{github_repo}@{full}")
    } else {
        format!("[`{short}`](https://github.com/{github_repo}/commit/{full})")
    }
}

/// Links a leading `Merge pull request #N` to the pull request.
pub fn pr_link(description: &str, github_repo: &str) -> String {
    MERGE_PR
        .replace(description, |caps: &regex::Captures<'_>| {
            let pr = &caps[1];
            format!("Merge pull request [#{pr}](https://github.com/{github_repo}/pull/{pr})")
        })
        .into_owned()
}

/// Rewrites commits and merge descriptions of `changes` into GitHub links.
///
/// Abbreviated hashes are expanded with `git rev-parse` in `repo`.
pub async fn linkify(
    repo: &GitRepo,
    changes: &mut [Change],
    github_repo: &str,
    gfm: bool,
) -> Result<()> {
    for change in changes.iter_mut() {
        let full = repo
            .rev_parse(&change.commit)
            .await
            .with_context(|| format!("Failed to link commit {}", change.commit))?;
        change.commit = commit_link(&change.commit, &full, github_repo, gfm);
        change.description = pr_link(&change.description, github_repo);
    }
    Ok(())
}
