// src/engine.rs

//! Evaluation pipeline for one invocation.
//!
//! [`Engine`] owns everything derived from the manifest (graph, resolver,
//! path patterns). [`Engine::report_for`] is the pure part: changed projects
//! in, affected set and task decisions out. [`Engine::evaluate`] wraps it
//! with the only IO step, asking a [`DiffSource`] for the changeset.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::changes::{ChangeSet, DiffSource, PathPatterns, ProjectResolver, collect_changes};
use crate::config::model::Manifest;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::gate::{TaskGate, pending_tasks};
use crate::graph::{ProjectGraph, affected_projects};
use crate::report::AffectedReport;

#[derive(Debug)]
pub struct Engine {
    manifest: Manifest,
    graph: ProjectGraph,
    resolver: ProjectResolver,
    patterns: PathPatterns,
    only_affected: bool,
}

impl Engine {
    /// Build the graph and path rules for `manifest`, rooted at `root`.
    ///
    /// `manifest_name` is the manifest's file name; a change to it at the
    /// root invalidates every project.
    pub fn new(
        manifest: Manifest,
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        manifest_name: Option<&str>,
    ) -> Result<Self> {
        let graph = ProjectGraph::from_manifest(&manifest);
        for cycle in graph.cycles() {
            warn!(?cycle, "dependency cycle between projects");
        }

        let mut patterns = PathPatterns::from_build(manifest.build_section())?;
        if let Some(name) = manifest_name {
            patterns = patterns.with_manifest_name(name);
        }

        let resolver = ProjectResolver::from_manifest(&manifest, root, fs);
        let only_affected = manifest.build_section().only_affected;

        Ok(Self {
            manifest,
            graph,
            resolver,
            patterns,
            only_affected,
        })
    }

    /// Override `[build].only_affected`.
    pub fn with_only_affected(mut self, only_affected: bool) -> Self {
        self.only_affected = only_affected;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn graph(&self) -> &ProjectGraph {
        &self.graph
    }

    pub fn resolver(&self) -> &ProjectResolver {
        &self.resolver
    }

    /// Collect the changeset from `source` and evaluate it.
    pub async fn evaluate(&self, source: &dyn DiffSource) -> AffectedReport {
        let changes = collect_changes(source, &self.resolver, &self.patterns, &self.graph).await;
        self.report_for(changes)
    }

    /// Compute the affected set and task decisions for a known changeset.
    pub fn report_for(&self, changes: ChangeSet) -> AffectedReport {
        let affected = affected_projects(&self.graph, &changes.projects);
        info!(changed = ?changes.projects, ?affected, "affected projects computed");

        let tasks = pending_tasks(&self.manifest);
        let decisions =
            TaskGate::new(&affected, self.manifest.root_project(), self.only_affected).decide(&tasks);

        AffectedReport {
            changed_files: changes.paths,
            changed: changes.projects,
            affected,
            global_trigger: changes.global_trigger,
            diff_unavailable: changes.unavailable,
            unresolved: self.graph.unresolved().to_vec(),
            only_affected: self.only_affected,
            tasks: decisions,
        }
    }
}
