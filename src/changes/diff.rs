// src/changes/diff.rs

//! Changeset sources.
//!
//! A [`DiffSource`] yields the list of changed paths for one invocation.
//! Failures never escape as errors: a source that cannot answer returns
//! [`DiffOutcome::Unavailable`] and the collector treats that as "nothing
//! changed".
//!
//! - [`GitDiff`] asks `git diff --name-only` in the build root, bounded by a
//!   timeout.
//! - [`StaticDiff`] returns a fixed list (`--files` on the command line, and
//!   tests).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

/// Result of asking a [`DiffSource`] for the changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Relative paths of changed files, as reported by the source.
    Changed(Vec<String>),
    /// The source could not produce a changeset; carries a human-readable
    /// reason for diagnostics.
    Unavailable(String),
}

/// Trait abstracting where the changeset comes from.
pub trait DiffSource: Send + Sync {
    fn changed_paths(&self) -> Pin<Box<dyn Future<Output = DiffOutcome> + Send + '_>>;
}

/// A fixed list of changed paths.
#[derive(Debug, Clone, Default)]
pub struct StaticDiff {
    paths: Vec<String>,
}

impl StaticDiff {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl DiffSource for StaticDiff {
    fn changed_paths(&self) -> Pin<Box<dyn Future<Output = DiffOutcome> + Send + '_>> {
        let paths = self.paths.clone();
        Box::pin(async move { DiffOutcome::Changed(paths) })
    }
}

/// `git diff --name-only -z --no-renames --relative <base> [<head>]` run in
/// the build root.
///
/// Without `head` the working tree is compared against `base`, so
/// uncommitted edits count as changes. Renames are reported as a delete plus
/// an add so the project losing the file is seen too. Paths are NUL-separated
/// and unquoted (`core.quotePath=false`), so non-ASCII names pass through
/// verbatim.
#[derive(Debug, Clone)]
pub struct GitDiff {
    program: String,
    root: PathBuf,
    base: String,
    head: Option<String>,
    timeout: Duration,
}

impl GitDiff {
    pub fn new(root: impl Into<PathBuf>, base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            root: root.into(),
            base: base.into(),
            head: None,
            timeout,
        }
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    /// Use a different executable instead of `git` from `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-c".to_string(),
            "core.quotePath=false".to_string(),
            "diff".to_string(),
            "--name-only".to_string(),
            "-z".to_string(),
            "--no-renames".to_string(),
            "--relative".to_string(),
            self.base.clone(),
        ];
        if let Some(head) = &self.head {
            args.push(head.clone());
        }
        args.push("--".to_string());
        args
    }

    async fn run(&self) -> DiffOutcome {
        let args = self.args();
        info!(
            program = %self.program,
            root = %self.root.display(),
            ?args,
            "collecting changed files"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return DiffOutcome::Unavailable(format!("failed to run {}: {e}", self.program));
            }
            Err(_) => {
                return DiffOutcome::Unavailable(format!(
                    "{} diff timed out after {:?}",
                    self.program, self.timeout
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return DiffOutcome::Unavailable(format!(
                "{} diff exited with {}: {}",
                self.program,
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                stderr.trim()
            ));
        }

        match String::from_utf8(output.stdout) {
            Ok(stdout) => {
                let paths = parse_name_only(&stdout);
                debug!(count = paths.len(), "git diff returned changed paths");
                DiffOutcome::Changed(paths)
            }
            Err(e) => DiffOutcome::Unavailable(format!("git diff output is not UTF-8: {e}")),
        }
    }
}

impl DiffSource for GitDiff {
    fn changed_paths(&self) -> Pin<Box<dyn Future<Output = DiffOutcome> + Send + '_>> {
        Box::pin(self.run())
    }
}

/// Split `--name-only -z` output into paths, dropping empty entries.
pub fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}
