//! The three suggestion strategies.
//!
//! Each strategy is a pure function of (request, context) except LATEST,
//! which may call the registry. None of them mutates anything.

use crate::{Modifier, SuggestOptions, Suggestion, TagResolver};
use sprout_core::{Descriptor, Locator, Project, SproutResult, Target};
use std::collections::HashSet;

/// REUSE: offer every distinct range other workspaces already request for
/// this ident, naming the owning workspace and manifest field.
pub(crate) fn reuse(
    request: &Descriptor,
    from_locator: Option<&Locator>,
    project: &Project,
) -> Vec<Suggestion> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut suggestions = Vec::new();

    for workspace in &project.workspaces {
        if from_locator.is_some_and(|from| workspace.locator() == *from) {
            continue;
        }

        for target in Target::ALL {
            let Some(descriptor) = workspace.manifest.section(target).get(&request.ident) else {
                continue;
            };
            if !seen.insert(descriptor.range.as_str()) {
                continue;
            }

            suggestions.push(Suggestion::new(
                descriptor.clone(),
                format!(
                    "reuse {} (already used by {} in {})",
                    descriptor.range,
                    workspace.ident,
                    target.field_name()
                ),
            ));
        }
    }

    suggestions
}

/// PROJECT: offer a version already present in the resolved graph, so a
/// compatible package is not installed twice. Yields at most one
/// suggestion: the highest installed version matching the request range
/// (any version when the range is a tag).
pub(crate) fn project(
    request: &Descriptor,
    project: &Project,
    modifier: Modifier,
) -> Option<Suggestion> {
    let installed = project.installed_versions(&request.ident)?;
    let req = request.version_req();

    let version = installed
        .iter()
        .filter(|version| req.as_ref().map_or(true, |req| req.matches(version)))
        .next_back()?;

    let range = modifier.apply(version);
    Some(Suggestion::new(
        Descriptor::new(request.ident.clone(), range.clone()),
        format!("attach {} (already installed as {})", range, version),
    ))
}

/// LATEST: resolve the tag embedded in the request against the registry
/// and synthesize a range with the modifier. Three overrides, checked in
/// order: a peer target forces `*` with no resolution at all; a local
/// workspace contributes its exact version, ignoring the modifier; an
/// explicit semver range is kept verbatim.
pub(crate) async fn latest<R: TagResolver>(
    request: &Descriptor,
    options: &SuggestOptions<'_, R>,
) -> SproutResult<Option<Suggestion>> {
    if options.target == Target::Peer {
        return Ok(Some(Suggestion::new(
            Descriptor::new(request.ident.clone(), "*"),
            "use * (any version the consumer provides)".to_string(),
        )));
    }

    if let Some(workspace) = options.project.workspace_by_ident(&request.ident) {
        let range = workspace.version.to_string();
        return Ok(Some(Suggestion::new(
            Descriptor::new(request.ident.clone(), range.clone()),
            format!("use {} (the local workspace version)", range),
        )));
    }

    if request.version_req().is_some() {
        return Ok(Some(Suggestion::new(
            request.clone(),
            format!("use {} (the requested range)", request.range),
        )));
    }

    let version = options
        .resolver
        .resolve_tag(&request.ident, &request.range)
        .await?;
    let range = options.modifier.apply(&version);

    Ok(Some(Suggestion::new(
        Descriptor::new(request.ident.clone(), range.clone()),
        format!("use {} (resolved from tag {})", range, request.range),
    )))
}
