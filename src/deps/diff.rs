//! Snapshot comparison
//!
//! Dependencies whose declared version is unchanged are trusted as unchanged
//! and never touch the network. Only when the declared versions differ are the
//! commits resolved, so a retag pointing at the same commit is not reported.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::remote::{RemoteSource, Resolver};
use super::{Dependency, DependencySet};
use crate::config::ProjectRename;

/// Applies `rename_deps` entries to the previous snapshot so renamed modules
/// line up with their current names.
///
/// Each entry is renamed at most once, based on its name before renaming.
pub fn rename_dependencies(deps: &mut DependencySet, renames: &BTreeMap<String, ProjectRename>) {
    let map: HashMap<&str, &str> =
        renames.values().map(|r| (r.old.as_str(), r.new.as_str())).collect();
    for (short_name, rename) in renames {
        if deps.contains(&rename.old) {
            tracing::debug!("Renaming {} from {} to {}", short_name, rename.old, rename.new);
        }
    }
    deps.rename_all(&map);
}

/// Dependencies of `current` that changed relative to `previous`, sorted by
/// name.
///
/// Missing commits and clone URLs are filled in on both sets while comparing.
pub async fn updated_dependencies<S: RemoteSource>(
    previous: &mut DependencySet,
    current: &mut DependencySet,
    ignored: &[String],
    resolver: &Resolver<'_, S>,
) -> Result<Vec<Dependency>> {
    let ignored: HashSet<&str> = ignored.iter().map(String::as_str).collect();
    let names: Vec<String> = current.iter().map(|d| d.name.clone()).collect();
    let mut updated = Vec::new();

    for name in names {
        if ignored.contains(name.as_str()) {
            continue;
        }
        let Some(c) = current.get_mut(&name) else {
            continue;
        };
        let Some(d) = previous.get_mut(&name) else {
            tracing::debug!("New dependency: {:?} {}", name, c.reference);
            updated.push(c.clone());
            continue;
        };

        if d.reference == c.reference {
            continue;
        }

        if d.sha.is_empty() {
            if d.git_url.is_empty() {
                d.git_url = resolver.git_url(&name).await;
                if c.git_url.is_empty() {
                    c.git_url.clone_from(&d.git_url);
                }
            }
            d.sha = resolver
                .commit(&d.git_url, &d.reference)
                .await
                .with_context(|| format!("failed to get sha for {name:?}"))?;
        }

        if c.sha.is_empty() {
            if c.git_url.is_empty() {
                c.git_url = resolver.git_url(&name).await;
            }
            c.sha = resolver
                .commit(&c.git_url, &c.reference)
                .await
                .with_context(|| format!("failed to get sha for {name:?}"))?;
        }

        if !d.sha.is_empty() && d.sha == c.sha {
            tracing::debug!("{:?} {} and {} are the same commit {}", name, d.reference, c.reference, c.sha);
            continue;
        }

        tracing::debug!(
            "Updated dependency: {:?} {}({}) -> {}({})",
            name,
            d.reference,
            d.sha,
            c.reference,
            c.sha
        );
        c.previous.clone_from(&d.reference);
        updated.push(c.clone());
    }

    updated.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(updated)
}
