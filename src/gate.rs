// src/gate.rs

//! Selective task gating.
//!
//! The gate only *decides*: it turns the affected set into one boolean per
//! pending task. Enabling or disabling the tasks is left to whatever runner
//! consumes the decisions.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::config::model::Manifest;
use crate::types::ProjectId;

/// A task of the build, attributed to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTask {
    pub project: ProjectId,
    pub name: String,
    /// Task path as a build tool spells it: `:project:task`, or `:task` for
    /// the root project.
    pub path: String,
}

impl PendingTask {
    pub fn new(project: impl Into<ProjectId>, name: impl Into<String>, root_project: &str) -> Self {
        let project = project.into();
        let name = name.into();
        let path = if project == root_project {
            format!(":{name}")
        } else {
            format!(":{project}:{name}")
        };
        Self {
            project,
            name,
            path,
        }
    }
}

impl fmt::Display for PendingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Inclusion decision for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDecision {
    #[serde(flatten)]
    pub task: PendingTask,
    pub included: bool,
}

/// Every task declared in the manifest, in project order.
pub fn pending_tasks(manifest: &Manifest) -> Vec<PendingTask> {
    let root = manifest.root_project();
    manifest
        .projects()
        .iter()
        .flat_map(|(id, project)| {
            project
                .tasks
                .iter()
                .map(move |task| PendingTask::new(id.clone(), task.clone(), root))
        })
        .collect()
}

/// Pure inclusion policy over a fixed affected set.
#[derive(Debug, Clone, Copy)]
pub struct TaskGate<'a> {
    affected: &'a BTreeSet<ProjectId>,
    root_project: &'a str,
    only_affected: bool,
}

impl<'a> TaskGate<'a> {
    pub fn new(affected: &'a BTreeSet<ProjectId>, root_project: &'a str, only_affected: bool) -> Self {
        Self {
            affected,
            root_project,
            only_affected,
        }
    }

    /// Whether `task` should run.
    ///
    /// Always true when gating is off and for tasks of the root project.
    pub fn includes(&self, task: &PendingTask) -> bool {
        !self.only_affected
            || task.project == self.root_project
            || self.affected.contains(&task.project)
    }

    pub fn decide(&self, tasks: &[PendingTask]) -> Vec<TaskDecision> {
        tasks
            .iter()
            .map(|task| TaskDecision {
                task: task.clone(),
                included: self.includes(task),
            })
            .collect()
    }
}
