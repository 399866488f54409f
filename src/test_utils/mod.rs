//! Test utilities for the release tool
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`TestGit`] builds real fixture repositories
//! - [`fixtures`] holds sample manifests in every supported format
//! - [`init_test_logging`] wires `tracing` into the test harness
//!
//! # Example
//!
//! ```rust,no_run
//! use release_tool::test_utils::TestGit;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let git = TestGit::new(temp.path());
//! git.init().unwrap();
//! git.config_user().unwrap();
//! git.write_file("go.mod", "module example.com/app\n").unwrap();
//! git.commit_all("initial").unwrap();
//! ```

pub mod fixtures;
pub mod git_helper;

pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Respects `RUST_LOG` when no explicit
/// level is given; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
