//! Parser for `vendor/modules.txt`
//!
//! Only lines whose first field is `#` describe modules:
//!
//! ```text
//! # github.com/foo/bar v1.2.3                             plain entry
//! # github.com/foo/old v1.0.0 => github.com/foo/new v2.0.0   replacement, keyed by the new module
//! # github.com/foo/old => github.com/foo/new v2.0.0        skipped
//! ## explicit                                             ignored
//! github.com/foo/bar/pkg                                  ignored
//! ```

use super::version::normalize;
use super::{Dependency, DependencySet};
use crate::constants::MODULES_TXT;
use crate::core::ReleaseError;

/// Parses `vendor/modules.txt` contents.
pub fn parse(content: &str) -> Result<DependencySet, ReleaseError> {
    let mut deps = DependencySet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts[0] != "#" {
            continue;
        }

        let (name, version) = match parts.len() {
            3 => (parts[1], parts[2]),
            // Replacement without an old version; the versioned form carries it.
            5 if parts[2] == "=>" => continue,
            6 if parts[3] == "=>" => (parts[4], parts[5]),
            _ => {
                return Err(ReleaseError::ManifestFormat {
                    file: MODULES_TXT.to_string(),
                    line: line.to_string(),
                });
            }
        };

        let normalized = normalize(version).ok_or_else(|| ReleaseError::InvalidVersion {
            section: MODULES_TXT.to_string(),
            version: version.to_string(),
        })?;

        deps.insert(Dependency::from_version(name, normalized));
    }

    Ok(deps)
}
