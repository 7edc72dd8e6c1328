//! # sprout-cli
//!
//! Workspace-aware dependency manager CLI.
//!
//! This is the main entry point for the Sprout CLI tool. It handles command
//! parsing, sets up logging, and dispatches to the appropriate command
//! handlers. Commands report their outcome through an execution report whose
//! exit code becomes the process exit code.

use clap::{Parser, Subcommand};
use sprout_core::{SproutError, SproutResult};
use std::process::ExitCode;
use tracing::info;

mod commands;
mod prompt;

use commands::CommandContext;

/// Workspace-aware dependency manager
#[derive(Parser)]
#[command(name = "sprout", version, about = "Workspace-aware dependency manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add dependencies to the active workspace
    Add {
        /// Packages to add, as `name`, `@scope/name` or `name@range`
        #[arg(required = true)]
        packages: Vec<String>,

        /// Pin the exact resolved version
        #[arg(short = 'E', long, conflicts_with = "tilde")]
        exact: bool,

        /// Use a tilde range instead of a caret range
        #[arg(short = 'T', long)]
        tilde: bool,

        /// Add to devDependencies
        #[arg(short = 'D', long, conflicts_with = "peer")]
        dev: bool,

        /// Add to peerDependencies
        #[arg(short = 'P', long)]
        peer: bool,

        /// Offer every known range and ask which one to use
        #[arg(short, long)]
        interactive: bool,
    },
    /// Install every workspace's dependencies
    Install,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting Sprout CLI v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(code) => ExitCode::from(code.clamp(0, u8::MAX as i32) as u8),
        Err(error) => {
            eprintln!("sprout: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> SproutResult<i32> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| SproutError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new()?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "sprout={},sprout_core={},sprout_registry={},sprout_suggest={}",
            level, level, level, level
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
