//! Release notes rendering with Tera
//!
//! The release context is serialized into a Tera context and rendered with
//! either a user-supplied template or the built-in one. Autoescaping is off
//! because the output is Markdown that embeds raw HTML (`<details>`).
//!
//! Templates see these top-level variables:
//!
//! | Variable | Type |
//! |----------|------|
//! | `project_name`, `github_repo`, `tag`, `version`, `previous`, `release_date`, `preface` | string |
//! | `pre_release` | bool |
//! | `notes` | map of `{title, description}` |
//! | `breaking_changes` | map of `{commit, description}` |
//! | `changes` | list of `{name, since, changes: [{commit, description}]}` |
//! | `contributors` | list of names |
//! | `dependencies` | list of `{name, ref, sha, previous, git_url}` |

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::constants::DEFAULT_TEMPLATE_FILE;
use crate::core::ReleaseError;

/// Template used when no `TEMPLATE` file exists.
pub const BUILTIN_TEMPLATE: &str = include_str!("release_notes.md.tera");

/// Reads the template at `path`.
///
/// A missing file at the default location falls back to
/// [`BUILTIN_TEMPLATE`]; a missing file anywhere else is an error.
pub fn load_template(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e)
            if e.kind() == std::io::ErrorKind::NotFound
                && path == Path::new(DEFAULT_TEMPLATE_FILE) =>
        {
            tracing::debug!("No {} file, using the built-in template", DEFAULT_TEMPLATE_FILE);
            Ok(BUILTIN_TEMPLATE.to_string())
        }
        Err(e) => Err(ReleaseError::from(e))
            .with_context(|| format!("Failed to read template: {}", path.display())),
    }
}

/// Renders `template` with `data` as its context.
pub fn render<T: Serialize>(template: &str, data: &T) -> Result<String> {
    let context = TeraContext::from_serialize(data).map_err(|e| ReleaseError::TemplateError {
        message: format_tera_error(&e),
    })?;

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);

    let rendered = tera.render_str(template, &context).map_err(|e| ReleaseError::TemplateError {
        message: format_tera_error(&e),
    })?;
    Ok(rendered)
}

/// Flattens a Tera error chain into one readable message.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = Vec::new();
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        let cleaned = err
            .to_string()
            .replace("Failed to render '__tera_one_off'", "")
            .replace("Failed to parse '__tera_one_off'", "")
            .replace("'__tera_one_off'", "template")
            .trim()
            .to_string();
        if !cleaned.is_empty() {
            messages.push(cleaned);
        }
        current = err.source();
    }

    if messages.is_empty() {
        "Template rendering failed".to_string()
    } else {
        messages.join("\n  → ")
    }
}
