//! Sample dependency manifests for tests
//!
//! Each fixture carries the path it lives at inside a repository together with
//! its contents, so tests can drop it into a [`TestGit`](super::TestGit) repo.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A manifest file and where it belongs in a repository.
#[derive(Clone, Debug)]
pub struct ManifestFixture {
    pub path: String,
    pub content: String,
}

impl ManifestFixture {
    /// Arbitrary manifest at an arbitrary path
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Legacy pinned-commit list with a comment, a full hash and an inline URL
    pub fn vendor_conf() -> Self {
        Self::new(
            "vendor.conf",
            r#"# runtime dependencies
github.com/foo/bar v1.2.3
github.com/foo/baz 0123456789abcdef0123456789abcdef01234567 # pinned
golang.org/x/sys v0.1.0 https://go.googlesource.com/sys
"#,
        )
    }

    /// `vendor/modules.txt` with plain, replaced and explicit-marker lines
    pub fn modules_txt() -> Self {
        Self::new(
            "vendor/modules.txt",
            r#"# github.com/foo/bar v1.2.3
## explicit
github.com/foo/bar
# github.com/foo/old v1.0.0 => github.com/foo/new v2.0.0
github.com/foo/new
# k8s.io/api v0.0.0-20200101000000-abcdef123456
## explicit; go 1.17
k8s.io/api/core/v1
"#,
        )
    }

    /// `go.mod` with block and single-line directives
    pub fn go_mod() -> Self {
        Self::new(
            "go.mod",
            r#"module example.com/app

go 1.21

require (
	github.com/foo/bar v1.2.3
	github.com/foo/baz v1.0.0+incompatible // indirect
	sigs.k8s.io/yaml v1.3.0
)

require golang.org/x/sys v0.0.0-20230101000000-0123456789ab

replace github.com/foo/baz => github.com/foo/baz v1.1.0

replace example.com/local => ./local
"#,
        )
    }

    /// Writes the fixture below `dir`, creating parent directories
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
