//! `sprout add` command implementation.
//!
//! Resolves a suggested range for every requested package, applies the
//! selections to the active workspace's manifest, and runs the install
//! under a streaming report.
//!
//! The flow has two abort checkpoints. A validation pass on a counter-only
//! report rejects requests with no viable suggestion before anything is
//! written; afterwards the install report's exit code is the command
//! result.

use futures::future::try_join_all;
use sprout_core::{
    Cache, Configuration, DependencyAddition, Descriptor, LightReport, MessageName, Project,
    Report, SproutError, SproutResult, StreamReport, Target,
};
use sprout_registry::{RegistryCache, RegistryClient};
use sprout_suggest::{
    suggested_descriptors, Modifier, Strategy, SuggestOptions, Suggestion, TagResolver,
};
use std::io::Write;
use std::sync::Arc;

use super::CommandContext;
use crate::prompt::{Prompt, StdinPrompt};

const DEFAULT_STRATEGIES: &[Strategy] = &[Strategy::Project, Strategy::Latest];
const INTERACTIVE_STRATEGIES: &[Strategy] = &[Strategy::Reuse, Strategy::Project, Strategy::Latest];

/// Parsed `sprout add` flags
pub struct AddOptions {
    pub packages: Vec<String>,
    pub exact: bool,
    pub tilde: bool,
    pub dev: bool,
    pub peer: bool,
    pub interactive: bool,
}

impl AddOptions {
    fn target(&self) -> Target {
        if self.peer {
            Target::Peer
        } else if self.dev {
            Target::Development
        } else {
            Target::Regular
        }
    }

    fn modifier(&self) -> Modifier {
        if self.exact {
            Modifier::Exact
        } else if self.tilde {
            Modifier::Tilde
        } else {
            Modifier::Caret
        }
    }
}

/// Execute the `sprout add` command
pub async fn execute(options: AddOptions, ctx: &CommandContext) -> SproutResult<i32> {
    let mut project = Project::find(&ctx.cwd).await?;
    let client = RegistryClient::new()?;
    let cache = RegistryCache::new(client.clone());
    let mut prompt = StdinPrompt::new();

    run_add(
        &mut project,
        &client,
        &cache,
        &mut prompt,
        Arc::clone(&ctx.configuration),
        std::io::stdout(),
        &options,
    )
    .await
}

/// A resolution failure that means "no candidate", not "stop the command"
fn is_resolution_miss(error: &SproutError) -> bool {
    matches!(
        error,
        SproutError::TagNotFound { .. }
            | SproutError::PackageNotFound { .. }
            | SproutError::NoCompatibleVersion { .. }
    )
}

/// The full add flow with every collaborator injected.
///
/// Returns the exit code to surface; Err is reserved for failures outside
/// any report (argument parsing, manifest IO, prompt IO).
pub async fn run_add<R, C, P, W>(
    project: &mut Project,
    resolver: &R,
    cache: &C,
    prompt: &mut P,
    configuration: Arc<Configuration>,
    stdout: W,
    options: &AddOptions,
) -> SproutResult<i32>
where
    R: TagResolver,
    C: Cache,
    P: Prompt,
    W: Write + Send,
{
    let requests = options
        .packages
        .iter()
        .map(|raw| Descriptor::parse(raw))
        .collect::<SproutResult<Vec<_>>>()?;

    let target = options.target();
    let from = project.active_workspace().locator();

    // Resolve all requests concurrently, then judge the outcome on a
    // counter-only report before any manifest mutation.
    let mut resolved: Vec<(Descriptor, Vec<Suggestion>)> = Vec::new();
    {
        let suggest_options = SuggestOptions {
            project: &*project,
            target,
            modifier: options.modifier(),
            strategies: if options.interactive {
                INTERACTIVE_STRATEGIES
            } else {
                DEFAULT_STRATEGIES
            },
            max_results: if options.interactive { usize::MAX } else { 1 },
            resolver,
        };

        let requests = &requests;
        let from = &from;
        let suggest_options = &suggest_options;
        let resolved = &mut resolved;

        let validation = LightReport::start(async move |report| {
            let all = try_join_all(requests.iter().map(|request| async move {
                match suggested_descriptors(request, Some(from), suggest_options).await {
                    Ok(suggestions) => Ok(suggestions),
                    Err(error) if is_resolution_miss(&error) => Ok(Vec::new()),
                    Err(error) => Err(error),
                }
            }))
            .await?;

            for (request, suggestions) in requests.iter().zip(all) {
                if suggestions.is_empty() {
                    report.report_error(
                        MessageName::CantSuggestResolutions,
                        &format!("{} can't be resolved to a satisfying range", request),
                    );
                } else {
                    resolved.push((request.clone(), suggestions));
                }
            }

            Ok(())
        })
        .await;

        if validation.has_errors() {
            return Ok(validation.exit_code());
        }
    }

    // Selection is sequential on purpose; prompts must not interleave.
    let mut selections = Vec::new();
    for (request, mut suggestions) in resolved {
        let choice = if suggestions.len() == 1 {
            0
        } else {
            let reasons: Vec<String> = suggestions
                .iter()
                .map(|suggestion| suggestion.reason.clone())
                .collect();
            prompt.select(
                &format!("Which range should be used for {}?", request.ident),
                &reasons,
            )?
        };

        selections.push(suggestions.swap_remove(choice).descriptor);
    }

    let workspace = project.active_workspace_mut();
    let mut additions = Vec::new();
    for descriptor in selections {
        additions.push(DependencyAddition {
            workspace: workspace.ident.clone(),
            target,
            descriptor: descriptor.clone(),
        });
        workspace.manifest.set(target, descriptor);
    }
    workspace.persist().await?;

    let project = &*project;
    let configuration_ref = Arc::clone(&configuration);
    let report = StreamReport::start(configuration, stdout, async move |report| {
        // Hook failures degrade to warnings; the install still runs.
        for error in configuration_ref.trigger_after_dependency_added(&additions) {
            report.report_warning(MessageName::Unnamed, &error.to_string());
        }

        project.install(cache, report).await
    })
    .await;

    Ok(report.exit_code())
}
