// src/graph/solver.rs

//! Affected-set closure.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::graph::builder::ProjectGraph;
use crate::types::ProjectId;

/// Return `changed` plus every project that transitively depends on a member
/// of `changed`.
///
/// Breadth-first over the reverse graph. A project enters the worklist only
/// when it first enters the result, so each project is expanded at most once
/// and cycles terminate. Identifiers unknown to `graph` stay in the result
/// but contribute no dependents.
pub fn affected_projects(graph: &ProjectGraph, changed: &BTreeSet<ProjectId>) -> BTreeSet<ProjectId> {
    let mut affected = changed.clone();
    let mut worklist: VecDeque<&str> = changed.iter().map(String::as_str).collect();

    while let Some(current) = worklist.pop_front() {
        for dependent in graph.dependents_of(current) {
            if affected.insert(dependent.clone()) {
                debug!(project = %dependent, via = %current, "project affected through dependency");
                worklist.push_back(dependent.as_str());
            }
        }
    }

    affected
}
