//! release-tool - release notes generator for Go projects
//!
//! Given a release file describing a tag (commit, previous release, notes and
//! dependency options), the tool collects everything that went into the
//! release and renders it through a template:
//!
//! - the commit log between the previous release and the release commit
//! - contributors, deduplicated through `.mailmap`
//! - dependencies whose version changed, read from `vendor.conf`,
//!   `vendor/modules.txt` or `go.mod` at both revisions
//! - changelogs of selected dependencies, cloned on demand
//!
//! # Modules
//!
//! - [`cli`] - command-line parsing and entry point
//! - [`release`] - the end-to-end pipeline
//! - [`config`] - release file parsing
//! - [`deps`] - manifest parsers, version normalization, remote resolution
//!   and the dependency differ
//! - [`changelog`] - commit logs, links and contributors
//! - [`git`] - read-only git access through the system binary
//! - [`cache`] - memo store for remote lookups
//! - [`templating`] - Tera rendering
//! - [`core`] - error types
//! - [`utils`] - platform helpers
//!
//! # Release file
//!
//! ```toml
//! commit = "v1.2.0"
//! previous = "v1.1.0"
//! project_name = "example"
//! github_repo = "example-org/example"
//! match_deps = "^github.com/(example-org/[a-zA-Z0-9-]+)$"
//! ignore_deps = ["github.com/example-org/example"]
//!
//! preface = """\
//! The first release with module support."""
//!
//! [notes.modules]
//! title = "Go modules"
//! description = "Dependencies are now managed with go.mod."
//!
//! [rename_deps.yaml]
//! old = "github.com/ghodss/yaml"
//! new = "sigs.k8s.io/yaml"
//!
//! [make_deps.runc]
//! variable = "RUNC_VERSION"
//! repository = "github.com/opencontainers/runc"
//! ```

pub mod cache;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod deps;
pub mod git;
pub mod release;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
