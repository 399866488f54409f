//! Integration test suite for release-tool
//!
//! End-to-end tests that build real git repositories in temporary directories
//! and run either the compiled binary or the library pipeline against them.
//! No test reaches the network: dependencies either carry commit hashes on
//! both sides or point at local clone URLs.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument handling, dry runs, templates and error reporting
//! - **dependencies**: manifest parsing at revisions and dependency diffing
//! - **release**: dependency changelogs, clone caching and mailmap handling

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod dependencies;
mod release;
