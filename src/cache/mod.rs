//! Memo store for remote resolution results
//!
//! Remote lookups (`git ls-remote` and `go-get` meta pages) are slow and their
//! answers rarely change, so successful results are remembered under an opaque
//! string key. Two implementations exist:
//!
//! - [`NoopCache`] never stores anything; every lookup misses.
//! - [`DirCache`] keeps one file per key below a root directory. File names are
//!   the SHA-256 hex digest of the key, so arbitrary keys (URLs, full command
//!   lines) map to safe, fixed-length names.
//!
//! Entries never expire. Deleting the directory is the only invalidation.
//!
//! ```text
//! $RELEASE_TOOL_CACHE/
//! ├── git/       # clones used for dependency changelogs
//! └── object/    # DirCache entries
//!     └── 3f1c…e9   # sha256("git ls-remote https://github.com/foo/bar v1.0.0 v1.0.0^{}")
//! ```

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value store consulted before every remote query.
pub trait Cache: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl Cache for NoopCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn put(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Disk-backed cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirCache {
    root: PathBuf,
}

impl DirCache {
    /// Creates a cache at `root`, creating the directory when missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache directory: {}", root.display()))?;
        Ok(Self {
            root,
        })
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(key_hash(key))
    }
}

impl Cache for DirCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(value) => {
                tracing::trace!("cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("Failed to read cache entry {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.entry_path(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write cache entry: {}", path.display()))
    }
}

/// SHA-256 hex digest used as the on-disk name for a key.
pub fn key_hash(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
