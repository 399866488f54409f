//! Parser for the legacy `vendor.conf` pinned-commit list
//!
//! ```text
//! # comment
//! github.com/foo/bar v1.2.3
//! github.com/foo/baz 0123456789abcdef0123456789abcdef01234567 # pinned
//! golang.org/x/sys   v0.1.0 https://go.googlesource.com/sys
//! ```

use regex::Regex;
use std::sync::LazyLock;

use super::{Dependency, DependencySet, origin};
use crate::constants::{SHORT_SHA_LEN, VENDOR_CONF};
use crate::core::ReleaseError;

static FULL_SHA: LazyLock<Regex> = LazyLock::new(|| {
    // Static pattern; compilation cannot fail.
    Regex::new("^[0-9a-f]{40}$").unwrap()
});

/// Strips surrounding whitespace and a trailing `comment_delim` comment.
/// Lines that start with the delimiter come back empty.
pub(crate) fn sanitize_line<'a>(line: &'a str, comment_delim: &str) -> &'a str {
    let line = line.trim();
    match line.find(comment_delim) {
        Some(0) => "",
        Some(idx) => line[..idx].trim(),
        None => line,
    }
}

/// Parses `vendor.conf` contents.
pub fn parse(content: &str) -> Result<DependencySet, ReleaseError> {
    let mut deps = DependencySet::new();

    for line in content.lines() {
        let line = sanitize_line(line, "#");
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(ReleaseError::ManifestFormat {
                file: VENDOR_CONF.to_string(),
                line: line.to_string(),
            });
        }

        let name = parts[0];
        let git_url = match parts.get(2) {
            Some(url) => (*url).to_string(),
            None => origin::known_git_url(name).unwrap_or_default(),
        };

        let mut reference = parts[1].to_string();
        let mut sha = String::new();
        if FULL_SHA.is_match(&reference) {
            reference.truncate(SHORT_SHA_LEN);
            sha.clone_from(&reference);
        }

        deps.insert(Dependency {
            name: name.to_string(),
            reference,
            sha,
            previous: String::new(),
            git_url,
        });
    }

    Ok(deps)
}
