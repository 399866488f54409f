//! Contributor aggregation from `git log --format=%aE %aN`

use anyhow::{Result, bail};
use std::collections::HashMap;

use crate::git::GitRepo;

/// Commit counts per author, accumulated across the project and any matched
/// dependencies.
#[derive(Debug, Default, Clone)]
pub struct Contributors {
    counts: HashMap<(String, String), usize>,
}

impl Contributors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every `email name` line of an author log.
    pub fn add_log(&mut self, raw: &str) -> Result<()> {
        for line in raw.lines() {
            let Some((email, name)) = line.split_once(' ') else {
                bail!("invalid author line: {line:?}");
            };
            *self.counts.entry((name.to_string(), email.to_string())).or_default() += 1;
        }
        Ok(())
    }

    /// Adds the authors of `previous..commit` in `repo`.
    pub async fn add_range(&mut self, repo: &GitRepo, previous: &str, commit: &str) -> Result<()> {
        let raw = repo.log_authors(previous, commit).await?;
        self.add_log(&raw)
    }

    /// Names ordered by commit count, most active first, ties by name.
    pub fn ordered_names(&self) -> Vec<String> {
        let mut all: Vec<_> = self.counts.iter().collect();
        all.sort_by(|((a_name, _), a_count), ((b_name, _), b_count)| {
            b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
        });

        all.into_iter()
            .map(|((name, email), count)| {
                tracing::debug!("Contributor: {} <{}> with {} commits", name, email, count);
                name.clone()
            })
            .collect()
    }
}
