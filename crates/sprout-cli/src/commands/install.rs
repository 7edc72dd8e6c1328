//! `sprout install` command implementation.
//!
//! Runs the project install under a streaming report; the report's exit
//! code is the command result.

use sprout_core::{Cache, Configuration, Project, Report, SproutResult, StreamReport};
use sprout_registry::{RegistryCache, RegistryClient};
use std::io::Write;
use std::sync::Arc;

use super::CommandContext;

/// Execute the `sprout install` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<i32> {
    let project = Project::find(&ctx.cwd).await?;
    let client = RegistryClient::new()?;
    let cache = RegistryCache::new(client);

    Ok(run_install(
        &project,
        &cache,
        Arc::clone(&ctx.configuration),
        std::io::stdout(),
    )
    .await)
}

/// The wrapped install with every collaborator injected
pub async fn run_install<C, W>(
    project: &Project,
    cache: &C,
    configuration: Arc<Configuration>,
    stdout: W,
) -> i32
where
    C: Cache,
    W: Write + Send,
{
    let report = StreamReport::start(configuration, stdout, async move |report| {
        project.install(cache, report).await
    })
    .await;

    report.exit_code()
}
