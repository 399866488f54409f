//! Platform-specific utilities
//!
//! Resolves user-supplied paths (tilde and environment variable expansion)
//! and locates the external tools the release tool shells out to.
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_tool::utils::platform::{command_exists, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let cache = resolve_path("~/.cache/release-tool")?;
//! println!("cache at {}", cache.display());
//! assert!(command_exists("git"));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Name of the git executable for this platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

/// Expands `~` and environment variables in a path.
///
/// # Supported Patterns
///
/// - `~/path` - home directory
/// - `$VAR/path` and `${VAR}/path` - environment variables
///
/// Undefined variables and `~user` forms are errors.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    if path.starts_with('~') && path != "~" && !path.starts_with("~/") {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
            Tilde expansion only supports '~/' for home directory."
        ));
    }

    let expanded =
        shellexpand::full(path).with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Returns true when `cmd` is found on `PATH`.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}
