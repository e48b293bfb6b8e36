// src/graph/builder.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::config::model::{Manifest, ProjectConfig};
use crate::graph::dependency::{ResolvedDependency, UnresolvedDependency, resolve_dependency};
use crate::types::ProjectId;

static NO_PROJECTS: BTreeSet<ProjectId> = BTreeSet::new();

/// Immutable project dependency graph for one invocation.
///
/// Holds both directions:
/// - `depends_on[A]` = projects A consumes,
/// - `dependents[B]` = projects consuming B (the exact transpose).
///
/// Every known project has an entry in both maps, possibly empty. Cycles are
/// representable; see [`ProjectGraph::cycles`].
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    depends_on: BTreeMap<ProjectId, BTreeSet<ProjectId>>,
    dependents: BTreeMap<ProjectId, BTreeSet<ProjectId>>,
    unresolved: Vec<UnresolvedDependency>,
}

/// Resolution result for a single project, merged into the graph afterwards.
#[derive(Debug)]
struct ProjectEdges {
    project: ProjectId,
    targets: BTreeSet<ProjectId>,
    unresolved: Vec<UnresolvedDependency>,
}

impl ProjectGraph {
    /// Build the graph from a validated [`Manifest`].
    ///
    /// Unresolvable declarations are logged and skipped; they never fail the
    /// build of the graph.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut graph = Self::with_projects(manifest.projects().keys().cloned());

        // No project's resolution depends on another's; resolve each on its
        // own and merge.
        let partials: Vec<ProjectEdges> = manifest
            .projects()
            .iter()
            .map(|(id, cfg)| resolve_project(manifest, id, cfg))
            .collect();

        for partial in partials {
            graph.merge(partial);
        }

        debug!(
            projects = graph.len(),
            edges = graph.edge_count(),
            unresolved = graph.unresolved.len(),
            "project graph built"
        );

        graph
    }

    /// Build a graph from plain `(dependent, dependency)` pairs.
    ///
    /// Both endpoints of every edge become projects, in addition to
    /// `projects`.
    pub fn from_edges<P, E, S>(projects: P, edges: E) -> Self
    where
        P: IntoIterator<Item = S>,
        E: IntoIterator<Item = (S, S)>,
        S: Into<ProjectId>,
    {
        let mut graph = Self::with_projects(projects.into_iter().map(Into::into));
        for (from, to) in edges {
            let (from, to) = (from.into(), to.into());
            graph.ensure_project(&from);
            graph.ensure_project(&to);
            graph.add_edge(from, to);
        }
        graph
    }

    fn with_projects(projects: impl Iterator<Item = ProjectId>) -> Self {
        let mut graph = Self::default();
        for id in projects {
            graph.ensure_project(&id);
        }
        graph
    }

    fn ensure_project(&mut self, id: &str) {
        if !self.depends_on.contains_key(id) {
            self.depends_on.insert(id.to_string(), BTreeSet::new());
            self.dependents.insert(id.to_string(), BTreeSet::new());
        }
    }

    fn merge(&mut self, partial: ProjectEdges) {
        for target in partial.targets {
            self.add_edge(partial.project.clone(), target);
        }
        self.unresolved.extend(partial.unresolved);
    }

    /// Record `from depends_on to`. Both must already be known projects.
    fn add_edge(&mut self, from: ProjectId, to: ProjectId) {
        if from == to {
            warn!(project = %from, "project depends on itself; ignoring edge");
            return;
        }
        if let Some(set) = self.dependents.get_mut(&to) {
            set.insert(from.clone());
        }
        if let Some(set) = self.depends_on.get_mut(&from) {
            set.insert(to);
        }
    }

    /// All project identifiers, sorted.
    pub fn projects(&self) -> impl Iterator<Item = &ProjectId> {
        self.depends_on.keys()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.depends_on.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.depends_on.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depends_on.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.depends_on.values().map(BTreeSet::len).sum()
    }

    /// Projects that `id` directly depends on.
    pub fn dependencies_of(&self, id: &str) -> &BTreeSet<ProjectId> {
        self.depends_on.get(id).unwrap_or(&NO_PROJECTS)
    }

    /// Projects that directly depend on `id`.
    pub fn dependents_of(&self, id: &str) -> &BTreeSet<ProjectId> {
        self.dependents.get(id).unwrap_or(&NO_PROJECTS)
    }

    /// The reverse adjacency map: project → its direct dependents.
    pub fn reverse(&self) -> &BTreeMap<ProjectId, BTreeSet<ProjectId>> {
        &self.dependents
    }

    /// Declarations skipped while building the graph.
    pub fn unresolved(&self) -> &[UnresolvedDependency] {
        &self.unresolved
    }

    /// Groups of projects that depend on each other in a cycle.
    ///
    /// Each group is sorted; groups are sorted by their first member.
    pub fn cycles(&self) -> Vec<Vec<ProjectId>> {
        let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();
        for id in self.depends_on.keys() {
            g.add_node(id.as_str());
        }
        for (from, targets) in self.depends_on.iter() {
            for to in targets {
                g.add_edge(from.as_str(), to.as_str(), ());
            }
        }

        let mut cycles: Vec<Vec<ProjectId>> = tarjan_scc(&g)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut members: Vec<ProjectId> = scc.into_iter().map(str::to_string).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}

fn resolve_project(manifest: &Manifest, id: &str, cfg: &ProjectConfig) -> ProjectEdges {
    let mut targets = BTreeSet::new();
    let mut unresolved = Vec::new();

    for spec in cfg.dependencies.iter() {
        match resolve_dependency(manifest, id, spec) {
            Ok(ResolvedDependency::InternalProjectRef(target)) => {
                targets.insert(target);
            }
            Ok(ResolvedDependency::ExternalArtifactRef { namespace, name, .. }) => {
                debug!(project = %id, %namespace, %name, "external dependency; not part of the graph");
            }
            Err(missing) => {
                warn!(
                    project = %id,
                    dependency = %missing.declaration,
                    reason = %missing.reason,
                    "could not resolve dependency; affected set may be incomplete"
                );
                unresolved.push(missing);
            }
        }
    }

    ProjectEdges {
        project: id.to_string(),
        targets,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<ProjectId> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reverse_graph_of_sample_build() {
        let g = ProjectGraph::from_edges(
            ["app", "number-utils", "string-utils"],
            [("app", "number-utils"), ("app", "string-utils")],
        );

        assert_eq!(g.dependents_of("number-utils"), &set(&["app"]));
        assert_eq!(g.dependents_of("string-utils"), &set(&["app"]));
        assert!(g.dependents_of("app").is_empty());
        assert_eq!(g.dependencies_of("app"), &set(&["number-utils", "string-utils"]));
        assert_eq!(g.reverse().len(), 3);
    }

    #[test]
    fn duplicate_edges_collapse_and_self_edges_drop() {
        let g = ProjectGraph::from_edges(
            Vec::<&str>::new(),
            [("a", "b"), ("a", "b"), ("c", "c")],
        );

        assert_eq!(g.edge_count(), 1);
        assert!(g.contains("c"));
        assert!(g.dependents_of("c").is_empty());
    }

    #[test]
    fn unknown_project_has_no_dependents() {
        let g = ProjectGraph::from_edges(["a"], Vec::<(&str, &str)>::new());
        assert!(g.dependents_of("zzz").is_empty());
        assert!(!g.contains("zzz"));
    }

    #[test]
    fn reports_cycles() {
        let g = ProjectGraph::from_edges(
            ["w"],
            [("x", "y"), ("y", "z"), ("z", "x"), ("w", "x")],
        );
        assert_eq!(g.cycles(), vec![vec!["x".to_string(), "y".to_string(), "z".to_string()]]);
    }
}
