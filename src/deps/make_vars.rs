//! Dependency versions pinned through Makefile variables
//!
//! Some projects pin tools in the Makefile instead of a manifest:
//!
//! ```make
//! RUNC_VERSION ?= v1.1.12
//! CRI_TOOLS    := ghcr.io/org/tools:v1.2.0-4-gdeadbee
//! ```
//!
//! Each configured variable is evaluated with `make` against the Makefile at the
//! release revision. A `git describe` style value (`v1.2.0-4-gdeadbee`) yields
//! the abbreviated commit after the `g`.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

use super::Dependency;
use super::version::NormalizedVersion;
use crate::config::MakeDependency;
use crate::constants::{GIT_QUERY_TIMEOUT, MAKEFILE};
use crate::core::ReleaseError;
use crate::git::GitRepo;

/// Reads every configured Makefile variable at `revision`.
pub async fn parse_make_dependencies(
    repo: &GitRepo,
    revision: &str,
    make_deps: &BTreeMap<String, MakeDependency>,
) -> Result<Vec<Dependency>> {
    if make_deps.is_empty() {
        return Ok(Vec::new());
    }

    let makefile = repo.show_file(revision, MAKEFILE).await.context("error finding Makefile")?;
    let make = which::which("make").map_err(|_| ReleaseError::ToolNotFound {
        tool: "make".to_string(),
    })?;

    let mut tmp = tempfile::Builder::new()
        .prefix("Makefile")
        .tempfile()
        .context("Failed to create temporary Makefile")?;
    tmp.write_all(makefile.as_bytes()).context("Failed to write temporary Makefile")?;
    tmp.flush()?;

    let mut deps = Vec::with_capacity(make_deps.len());
    for (name, make_dep) in make_deps {
        let output = eval_variable(&make, tmp.path(), &make_dep.variable)
            .await
            .with_context(|| format!("Failed to evaluate make dependency {name}"))?;
        deps.push(parse_make_version(&make_dep.repository, &make_dep.variable, &output)?);
    }

    tracing::debug!("make deps = {:?}", deps);
    Ok(deps)
}

/// Runs `make --eval=pp:\n\t@echo $(VAR)\n -f <makefile> pp`.
async fn eval_variable(make: &Path, makefile: &Path, variable: &str) -> Result<String> {
    let eval = format!("--eval=pp:\n\t@echo $({variable})\n");
    let mut cmd = Command::new(make);
    cmd.arg(eval).arg("-f").arg(makefile).arg("pp");
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);

    tracing::debug!("Evaluating Makefile variable {}", variable);
    let output = timeout(GIT_QUERY_TIMEOUT, cmd.output())
        .await
        .map_err(|_| ReleaseError::MakeFailed {
            variable: variable.to_string(),
            reason: "make timed out".to_string(),
        })?
        .with_context(|| format!("Failed to execute make for {variable}"))?;

    if !output.status.success() {
        return Err(ReleaseError::MakeFailed {
            variable: variable.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Turns the printed value of a Makefile variable into a dependency.
///
/// Only the part after the last `:` counts, so image references work too.
pub fn parse_make_version(
    repository: &str,
    variable: &str,
    output: &str,
) -> Result<Dependency, ReleaseError> {
    let value = output.trim().rsplit(':').next().unwrap_or_default();
    let fields: Vec<&str> = value.split('-').filter(|f| !f.is_empty()).collect();

    match fields.len() {
        1 | 2 => Ok(Dependency::from_version(
            repository,
            NormalizedVersion {
                value: value.to_string(),
                is_commit: false,
            },
        )),
        3 | 4 => {
            let last = fields[fields.len() - 1];
            let mut dep = Dependency::from_version(
                repository,
                NormalizedVersion {
                    value: last.chars().skip(1).collect(),
                    is_commit: true,
                },
            );
            dep.reference = value.to_string();
            Ok(dep)
        }
        _ => Err(ReleaseError::MakeFailed {
            variable: variable.to_string(),
            reason: format!("unparseable version: {value}"),
        }),
    }
}
