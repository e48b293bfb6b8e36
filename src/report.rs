// src/report.rs

//! Human-readable and JSON rendering of an evaluation.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::gate::TaskDecision;
use crate::graph::UnresolvedDependency;
use crate::types::{ProjectId, ReportFormat};

/// Outcome of one invocation, as handed to the task runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedReport {
    pub changed_files: Vec<String>,
    pub changed: BTreeSet<ProjectId>,
    pub affected: BTreeSet<ProjectId>,
    pub global_trigger: Option<String>,
    pub diff_unavailable: Option<String>,
    pub unresolved: Vec<UnresolvedDependency>,
    pub only_affected: bool,
    pub tasks: Vec<TaskDecision>,
}

impl AffectedReport {
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
        }
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing report to JSON")
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if let Some(reason) = &self.diff_unavailable {
            let _ = writeln!(out, "changeset unavailable: {reason}");
        }
        if let Some(trigger) = &self.global_trigger {
            let _ = writeln!(out, "global change: {trigger} (all projects affected)");
        }

        let _ = writeln!(out, "changed files: {}", self.changed_files.len());
        write_list(&mut out, "changed projects", &self.changed);
        write_list(&mut out, "affected projects", &self.affected);

        if !self.unresolved.is_empty() {
            let _ = writeln!(out, "unresolved dependencies ({}):", self.unresolved.len());
            for u in &self.unresolved {
                let _ = writeln!(out, "  - {u}");
            }
        }

        if !self.tasks.is_empty() {
            let mode = if self.only_affected { "only affected" } else { "all" };
            let _ = writeln!(out, "tasks ({mode}):");
            for decision in &self.tasks {
                let verdict = if decision.included { "run " } else { "skip" };
                let _ = writeln!(out, "  {verdict} {}", decision.task);
            }
        }

        out
    }

    /// Paths of the tasks that should run.
    pub fn included_tasks(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|d| d.included)
            .map(|d| d.task.path.as_str())
            .collect()
    }
}

fn write_list(out: &mut String, title: &str, items: &BTreeSet<ProjectId>) {
    let _ = writeln!(out, "{title} ({}):", items.len());
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}
