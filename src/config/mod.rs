//! Configuration for a release run
//!
//! The only configuration file is the per-release TOML file described in
//! [`release`]. Everything else comes from command-line flags and the
//! `RELEASE_TOOL_CACHE` environment variable, handled by [`crate::cli`].

mod parser;
pub mod release;

pub use parser::parse_config;
pub use release::{MakeDependency, Note, ProjectRename, ReleaseConfig, tag_from_path};
