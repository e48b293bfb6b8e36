// src/changes/collector.rs

//! Changeset → Changed-Project Set.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::changes::diff::{DiffOutcome, DiffSource};
use crate::changes::path_utils::normalize_rel_path;
use crate::changes::patterns::PathPatterns;
use crate::changes::resolver::ProjectResolver;
use crate::graph::ProjectGraph;
use crate::types::ProjectId;

/// Everything the collector learned about the current changeset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// Normalised changed paths (empty if the diff was unavailable).
    pub paths: Vec<String>,
    /// Projects whose sources were modified, or every project on a global
    /// trigger.
    pub projects: BTreeSet<ProjectId>,
    /// First path that invalidated the whole build, if any.
    pub global_trigger: Option<String>,
    /// Why the diff could not be obtained, if it could not.
    pub unavailable: Option<String>,
}

/// Ask `source` for the changeset and map it onto projects.
///
/// An unavailable diff is logged and yields an empty changeset.
pub async fn collect_changes(
    source: &dyn DiffSource,
    resolver: &ProjectResolver,
    patterns: &PathPatterns,
    graph: &ProjectGraph,
) -> ChangeSet {
    match source.changed_paths().await {
        DiffOutcome::Changed(paths) => changed_projects(&paths, resolver, patterns, graph),
        DiffOutcome::Unavailable(reason) => {
            warn!(%reason, "changeset unavailable; treating as no changes");
            ChangeSet {
                unavailable: Some(reason),
                ..ChangeSet::default()
            }
        }
    }
}

/// Map changed paths onto the projects that own them.
///
/// - Any global trigger short-circuits to every project in `graph`.
/// - Ignored and unowned paths are dropped.
pub fn changed_projects(
    paths: &[String],
    resolver: &ProjectResolver,
    patterns: &PathPatterns,
    graph: &ProjectGraph,
) -> ChangeSet {
    let paths: Vec<String> = paths
        .iter()
        .filter_map(|p| {
            let normalized = normalize_rel_path(p);
            if normalized.is_none() {
                debug!(path = %p, "skipping malformed changed path");
            }
            normalized
        })
        .collect();

    if let Some(trigger) = paths.iter().find(|p| patterns.is_global_trigger(p)).cloned() {
        info!(
            path = %trigger,
            "build definition changed; every project is considered changed"
        );
        return ChangeSet {
            projects: graph.projects().cloned().collect(),
            global_trigger: Some(trigger),
            paths,
            unavailable: None,
        };
    }

    let mut projects = BTreeSet::new();
    for path in paths.iter() {
        if patterns.is_ignored(path) {
            debug!(path = %path, "changed path matches an ignore pattern");
            continue;
        }
        match resolver.resolve(path) {
            Some(owner) => {
                projects.insert(owner.to_string());
            }
            None => debug!(path = %path, "changed path has no owning project"),
        }
    }

    info!(?projects, files = paths.len(), "changed projects");

    ChangeSet {
        paths,
        projects,
        global_trigger: None,
        unavailable: None,
    }
}
