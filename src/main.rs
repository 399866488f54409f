//! release-tool entry point
//!
//! Parses arguments, runs the release pipeline and reports failures with
//! context and suggestions.

use anyhow::Result;
use clap::Parser;
use release_tool::cli;
use release_tool::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.init_logging();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
