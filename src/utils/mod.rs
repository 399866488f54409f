//! Cross-platform utilities and helpers
//!
//! - [`platform`] - Platform-specific helpers and path resolution

pub mod platform;

pub use platform::{command_exists, get_git_command, resolve_path};
