//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking a CommandContext. Commands
//! return the exit code of their execution report rather than a Result so
//! that warnings never change the process outcome.

use sprout_core::{Configuration, SproutError, SproutResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub mod add;
pub mod install;


use crate::Commands;

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: PathBuf,
    pub configuration: Arc<Configuration>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new() -> SproutResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            SproutError::io("Failed to get current directory".to_string(), e)
        })?;

        let configuration = Arc::new(Configuration::detect());

        Ok(Self { cwd, configuration })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> SproutResult<i32> {
    match command {
        Commands::Add {
            packages,
            exact,
            tilde,
            dev,
            peer,
            interactive,
        } => {
            info!("Adding dependencies: {:?}", packages);
            let options = add::AddOptions {
                packages,
                exact,
                tilde,
                dev,
                peer,
                interactive,
            };
            add::execute(options, ctx).await
        }
        Commands::Install => {
            info!("Installing dependencies");
            install::execute(ctx).await
        }
    }
}
