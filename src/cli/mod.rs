//! Command-line interface for the release tool.
//!
//! A single command: read a release file, generate notes for the tagged
//! release and either print them (`--dry`) or just validate that they render.
//!
//! ```bash
//! # Preview notes for v1.2.0 using releases/v1.2.0.toml
//! release-tool --dry releases/v1.2.0.toml
//!
//! # Link commits and PRs, reuse clones and remote lookups between runs
//! release-tool -n -l --cache ~/.cache/release-tool releases/v1.2.0.toml
//! ```
//!
//! Logging goes to stderr through `tracing`. `RUST_LOG` wins when set;
//! otherwise `--debug` selects `debug` and the default is `info`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::{CACHE_ENV_VAR, DEFAULT_TEMPLATE_FILE};
use crate::git::ensure_git_available;
use crate::release::{self, ReleaseOptions};
use crate::utils::platform::resolve_path;

/// Generate release notes for a tagged release.
#[derive(Parser, Debug)]
#[command(
    name = "release-tool",
    about = "Generate release notes from a release TOML file",
    version,
    long_about = "Generate release notes from a release TOML file.\n\n\
        The notes list the project's commits, contributors and the dependencies \
        that changed between the previous release and the release commit."
)]
pub struct Cli {
    /// Release TOML file describing the release.
    #[arg(value_name = "RELEASE_FILE")]
    release_file: PathBuf,

    /// Print the rendered notes instead of only validating them.
    #[arg(short = 'n', long = "dry")]
    dry: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Tag name for the release; defaults to the release file name without `.toml`.
    #[arg(short, long)]
    tag: Option<String>,

    /// Template file used to render the notes.
    #[arg(long, default_value = DEFAULT_TEMPLATE_FILE)]
    template: PathBuf,

    /// Add links to commits and pull requests.
    #[arg(short, long)]
    linkify: bool,

    /// Use GitHub flavored `owner/repo@sha` commit references when linkifying.
    #[arg(short, long)]
    gfm: bool,

    /// Cache directory for dependency clones and remote lookups.
    #[arg(long, env = CACHE_ENV_VAR)]
    cache: Option<String>,
}

impl Cli {
    /// Log filter for this invocation.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    }

    /// Installs the stderr log subscriber. Safe to call more than once.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Translates the flags into pipeline options.
    pub fn build_options(&self) -> Result<ReleaseOptions> {
        let cache_dir = match self.cache.as_deref() {
            Some(dir) if !dir.is_empty() => Some(resolve_path(dir)?),
            _ => None,
        };

        Ok(ReleaseOptions {
            release_file: self.release_file.clone(),
            tag: self.tag.clone(),
            template: self.template.clone(),
            linkify: self.linkify,
            gfm: self.gfm,
            cache_dir,
            repo_dir: PathBuf::from("."),
        })
    }

    /// Runs the release pipeline.
    pub async fn execute(self) -> Result<()> {
        ensure_git_available()?;

        let options = self.build_options()?;
        let rendered = release::generate(&options).await?;

        if self.dry {
            print!("{rendered}");
        } else {
            tracing::info!("release complete!");
        }
        Ok(())
    }
}
