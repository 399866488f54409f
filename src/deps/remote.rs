//! Remote commit and origin resolution with caching
//!
//! [`Resolver`] answers two questions for the differ: where a module's
//! repository lives ([`Resolver::git_url`]) and which commit a ref names on that
//! remote ([`Resolver::commit`]). Both consult the [`Cache`] first; the actual
//! network traffic goes through a [`RemoteSource`], which tests replace with a
//! counting fake.
//!
//! Remote failures are not fatal. An unresolvable origin yields an empty URL
//! and an unreachable ref yields an empty commit, so one bad dependency does
//! not abort the release notes. The exceptions are a missing `git` binary and
//! an `ls-remote` answer with no usable line.

use anyhow::{Context, Result};
use std::future::Future;

use super::origin::{fetch_go_import, go_get_url, known_git_url};
use crate::cache::Cache;
use crate::constants::{HTTP_TIMEOUT, SHORT_SHA_LEN};
use crate::core::ReleaseError;
use crate::git;

/// Network side of resolution.
pub trait RemoteSource: Send + Sync {
    /// Raw `git ls-remote <url> <ref> <ref>^{}` output.
    fn ls_remote(&self, url: &str, reference: &str) -> impl Future<Output = Result<String>> + Send;

    /// Clone URL advertised by the `go-get` page at `query_url`.
    fn go_import(&self, module: &str, query_url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Production source: the system `git` plus an HTTP client.
#[derive(Debug, Clone)]
pub struct GitRemote {
    client: reqwest::Client,
}

impl GitRemote {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("release-tool/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
        })
    }
}

impl RemoteSource for GitRemote {
    async fn ls_remote(&self, url: &str, reference: &str) -> Result<String> {
        git::ls_remote(url, reference).await
    }

    async fn go_import(&self, module: &str, query_url: &str) -> Result<String> {
        fetch_go_import(&self.client, query_url, module).await
    }
}

/// Cache-aware resolution front end.
pub struct Resolver<'a, S> {
    source: &'a S,
    cache: &'a dyn Cache,
}

impl<'a, S: RemoteSource> Resolver<'a, S> {
    pub fn new(source: &'a S, cache: &'a dyn Cache) -> Self {
        Self {
            source,
            cache,
        }
    }

    /// Clone URL for `module`, or an empty string when it cannot be resolved.
    pub async fn git_url(&self, module: &str) -> String {
        if let Some(url) = known_git_url(module) {
            return url;
        }

        let key = go_get_url(module);
        if let Some(value) = self.cache.get(&key) {
            tracing::debug!(cache = "hit", "{}", key);
            return String::from_utf8_lossy(&value).into_owned();
        }
        tracing::debug!(cache = "miss", "{}", key);

        match self.source.go_import(module, &key).await {
            Ok(url) => {
                self.store(&key, &url);
                url
            }
            Err(e) => {
                tracing::debug!("git url for {:?} not resolved: {:#}", module, e);
                String::new()
            }
        }
    }

    /// Commit `reference` points at on `url`, truncated to 12 characters.
    ///
    /// Returns an empty string when `url` is empty or the remote query fails.
    /// A query that succeeds but lists no usable ref (git exits 0 with no
    /// output for an unknown ref) is fatal: it returns
    /// [`ReleaseError::RevisionNotFound`] and nothing is cached.
    pub async fn commit(&self, url: &str, reference: &str) -> Result<String> {
        if url.is_empty() {
            return Ok(String::new());
        }

        let key = format!("git ls-remote {url} {reference} {reference}^{{}}");
        if let Some(value) = self.cache.get(&key) {
            tracing::debug!(cache = "hit", "{}", key);
            return Ok(String::from_utf8_lossy(&value).into_owned());
        }
        tracing::debug!(cache = "miss", "{}", key);

        let output = match self.source.ls_remote(url, reference).await {
            Ok(output) => output,
            Err(e) => {
                if matches!(e.downcast_ref::<ReleaseError>(), Some(ReleaseError::GitNotFound)) {
                    return Err(e);
                }
                tracing::debug!(key = %key, "not using sha: {:#}", e);
                return Ok(String::new());
            }
        };

        let sha = parse_ls_remote(&output).ok_or_else(|| ReleaseError::RevisionNotFound {
            url: url.to_string(),
            reference: reference.to_string(),
        })?;

        self.store(&key, &sha);
        Ok(sha)
    }

    fn store(&self, key: &str, value: &str) {
        if let Err(e) = self.cache.put(key, value.as_bytes()) {
            tracing::debug!("cache write for {} failed: {:#}", key, e);
        }
    }
}

/// Picks the commit from `ls-remote` output.
///
/// Lines must have exactly two fields. Once a peeled (`^{}`) line has been
/// seen, later unpeeled lines are ignored. The last accepted hash wins.
pub fn parse_ls_remote(output: &str) -> Option<String> {
    let mut sha: Option<&str> = None;
    let mut peeled = false;

    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [hash, name] = fields.as_slice() else {
            continue;
        };

        if name.ends_with("^{}") {
            peeled = true;
        } else if peeled {
            continue;
        }
        sha = Some(*hash);
    }

    sha.filter(|s| !s.is_empty()).map(|s| s.chars().take(SHORT_SHA_LEN).collect())
}
