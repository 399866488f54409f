//! Global constants used throughout the release tool.
//!
//! Timeouts, manifest locations and other fixed values that several modules
//! share live here so they stay discoverable.

use std::time::Duration;

/// Legacy pinned-commit dependency list.
pub const VENDOR_CONF: &str = "vendor.conf";

/// Module list written by `go mod vendor`.
pub const MODULES_TXT: &str = "vendor/modules.txt";

/// Module declaration file.
pub const GO_MOD: &str = "go.mod";

/// Makefile read for `make_deps` variables.
pub const MAKEFILE: &str = "Makefile";

/// Number of hex characters kept from a commit hash.
///
/// Matches the abbreviation length Go pseudo-versions use, so hashes coming from
/// different manifest formats compare equal.
pub const SHORT_SHA_LEN: usize = 12;

/// Default template path; falls back to the built-in template when absent.
pub const DEFAULT_TEMPLATE_FILE: &str = "TEMPLATE";

/// Environment variable holding the cache directory.
pub const CACHE_ENV_VAR: &str = "RELEASE_TOOL_CACHE";

/// Timeout for local git queries (5 minutes).
pub const GIT_QUERY_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for `git ls-remote` (60 seconds).
///
/// Prevents an unreachable remote from stalling the whole run.
pub const GIT_REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for Git clone operations (120 seconds).
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for Git fetch operations (60 seconds).
pub const GIT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for `go-get` meta tag lookups (30 seconds).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
