//! Parser for `go.mod`
//!
//! Only `require` and `replace` directives matter for release notes; every
//! other directive (`module`, `go`, `toolchain`, `exclude`, `retract`, ...) is
//! skipped, including its block form. Both directive shapes are accepted:
//!
//! ```text
//! require github.com/foo/bar v1.2.3
//! require (
//!     github.com/foo/baz v1.0.0 // indirect
//! )
//! replace github.com/foo/baz => github.com/foo/baz v1.1.0
//! replace example.com/local => ./local
//! ```
//!
//! A replacement overrides the version of the require entry whose path equals
//! the replacement *target*. Replacements pointing at local directories are
//! ignored.

use super::version::normalize;
use super::{Dependency, DependencySet};
use crate::constants::GO_MOD;
use crate::core::ReleaseError;

const REQUIRE_SECTION: &str = "require section";
const REPLACE_SECTION: &str = "replace section";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Require,
    Replace,
    Other,
}

/// A `replace` directive's target module.
#[derive(Debug)]
struct Replacement<'a> {
    path: &'a str,
    version: Option<&'a str>,
}

/// Parses `go.mod` contents.
pub fn parse(content: &str) -> Result<DependencySet, ReleaseError> {
    let mut deps = DependencySet::new();
    let mut replacements = Vec::new();
    let mut block: Option<Block> = None;

    for raw in content.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().map(unquote).collect();

        if let Some(current) = block {
            if tokens == [")"] {
                block = None;
                continue;
            }
            match current {
                Block::Require => deps.insert(parse_require(&tokens, line)?),
                Block::Replace => replacements.push(parse_replace(&tokens, line)?),
                Block::Other => {}
            }
            continue;
        }

        let kind = match tokens[0] {
            "require" => Block::Require,
            "replace" => Block::Replace,
            _ => Block::Other,
        };
        let rest = &tokens[1..];

        if rest == ["("] {
            block = Some(kind);
            continue;
        }

        match kind {
            Block::Require => deps.insert(parse_require(rest, line)?),
            Block::Replace => replacements.push(parse_replace(rest, line)?),
            Block::Other => {}
        }
    }

    if block.is_some() {
        return Err(format_error("unterminated block"));
    }

    for replacement in replacements {
        if is_local_path(replacement.path) {
            continue;
        }

        let version = replacement.version.unwrap_or_default();
        let normalized = normalize(version).ok_or_else(|| ReleaseError::InvalidVersion {
            section: REPLACE_SECTION.to_string(),
            version: format!("{} {}", replacement.path, version).trim_end().to_string(),
        })?;

        match deps.get_mut(replacement.path) {
            Some(existing) => {
                let replaced = Dependency::from_version(replacement.path, normalized);
                existing.reference = replaced.reference;
                existing.sha = replaced.sha;
                existing.git_url = replaced.git_url;
            }
            None => {
                tracing::debug!(
                    "dependency {} found in replace section, but doesn't exist in requires section. Skipping",
                    replacement.path
                );
            }
        }
    }

    Ok(deps)
}

fn parse_require(tokens: &[&str], line: &str) -> Result<Dependency, ReleaseError> {
    let [path, version] = tokens else {
        return Err(format_error(line));
    };
    let normalized = normalize(version).ok_or_else(|| ReleaseError::InvalidVersion {
        section: REQUIRE_SECTION.to_string(),
        version: format!("{path} {version}"),
    })?;
    Ok(Dependency::from_version(*path, normalized))
}

fn parse_replace<'a>(tokens: &[&'a str], line: &str) -> Result<Replacement<'a>, ReleaseError> {
    let arrow = tokens.iter().position(|t| *t == "=>").ok_or_else(|| format_error(line))?;
    let (old, new) = (&tokens[..arrow], &tokens[arrow + 1..]);

    if old.is_empty() || old.len() > 2 {
        return Err(format_error(line));
    }
    match *new {
        [path] => Ok(Replacement {
            path,
            version: None,
        }),
        [path, version] => Ok(Replacement {
            path,
            version: Some(version),
        }),
        _ => Err(format_error(line)),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

fn is_local_path(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../") || path.starts_with('/')
}

fn format_error(line: &str) -> ReleaseError {
    ReleaseError::ManifestFormat {
        file: GO_MOD.to_string(),
        line: line.to_string(),
    }
}
