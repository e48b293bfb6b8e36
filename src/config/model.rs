// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::types::ProjectId;

/// Top-level build manifest as read from a TOML file.
///
/// ```toml
/// [build]
/// root_project = "root"
/// group = "com.example"
/// base = "origin/main"
///
/// [project.app]
/// tasks = ["check", "run"]
/// dependencies = [{ project = "number-utils" }]
///
/// [project.number-utils]
/// tasks = ["check"]
/// ```
///
/// This is the unvalidated form; use [`Manifest`] (obtained through
/// `Manifest::try_from` or [`crate::config::load_and_validate`]) everywhere
/// else.
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    /// Build-wide settings from `[build]`.
    #[serde(default)]
    pub build: BuildSection,

    /// All projects from `[project.<id>]`, keyed by project identifier.
    #[serde(default)]
    pub project: BTreeMap<ProjectId, ProjectConfig>,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Identifier of the top-level coordinating project. Its tasks are never
    /// gated out.
    #[serde(default = "default_root_project")]
    pub root_project: ProjectId,

    /// Namespace shared by the projects of this build. Artifact dependencies
    /// in this group are resolved against the known projects.
    #[serde(default)]
    pub group: Option<String>,

    /// Baseline reference handed to `git diff`.
    #[serde(default = "default_base")]
    pub base: String,

    /// File names that mark a directory as a project root. The same names at
    /// the build root invalidate every project.
    #[serde(default = "default_build_files")]
    pub build_files: Vec<String>,

    /// Whether tasks of unaffected projects are skipped.
    ///
    /// Off by default: every task runs unless gating is requested here or on
    /// the command line.
    #[serde(default)]
    pub only_affected: bool,

    /// Upper bound for the version-control diff (e.g. `"30s"`).
    #[serde(default = "default_diff_timeout")]
    pub diff_timeout: String,

    /// Extra globs whose changes invalidate every project.
    #[serde(default)]
    pub global_files: Vec<String>,

    /// Globs for changed paths that never make a project dirty.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_root_project() -> ProjectId {
    "root".to_string()
}

fn default_base() -> String {
    "main".to_string()
}

fn default_build_files() -> Vec<String> {
    vec!["build.gradle.kts".to_string(), "build.gradle".to_string()]
}

fn default_diff_timeout() -> String {
    "30s".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            root_project: default_root_project(),
            group: None,
            base: default_base(),
            build_files: default_build_files(),
            only_affected: false,
            diff_timeout: default_diff_timeout(),
            global_files: Vec::new(),
            ignore: Vec::new(),
        }
    }
}

/// `[project.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Directory of the project relative to the build root.
    ///
    /// If `None`, the project identifier is used as the directory name.
    #[serde(default)]
    pub dir: Option<String>,

    /// Project-specific namespace; falls back to `[build].group`.
    #[serde(default)]
    pub group: Option<String>,

    /// Names of the tasks this project contributes to the build.
    #[serde(default)]
    pub tasks: Vec<String>,

    /// Dependency declarations, internal or external.
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

impl ProjectConfig {
    /// Effective directory for the project with identifier `id`.
    pub fn effective_dir<'a>(&'a self, id: &'a str) -> &'a str {
        self.dir.as_deref().unwrap_or(id)
    }

    /// Effective namespace given the build-wide default.
    pub fn effective_group<'a>(&'a self, default_group: Option<&'a str>) -> Option<&'a str> {
        self.group.as_deref().or(default_group)
    }
}

/// A dependency declaration as written in the manifest.
///
/// ```toml
/// dependencies = [
///   { project = "number-utils" },
///   { group = "com.example", name = "string-utils" },
///   { group = "org.junit", name = "junit", version = "4.13" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Direct reference to another project of this build.
    Project { project: ProjectId },
    /// Coordinates of an artifact; may still point inside the build when
    /// its group matches one of the build's namespaces.
    Artifact {
        group: String,
        name: String,
        #[serde(default)]
        version: Option<String>,
    },
}

/// A validated manifest.
///
/// Only constructible through `TryFrom<RawManifest>` (see `validate.rs`), so
/// holders can rely on the invariants checked there.
#[derive(Debug, Clone)]
pub struct Manifest {
    build: BuildSection,
    projects: BTreeMap<ProjectId, ProjectConfig>,
    diff_timeout: Duration,
}

impl Manifest {
    pub(crate) fn new_unchecked(
        build: BuildSection,
        projects: BTreeMap<ProjectId, ProjectConfig>,
        diff_timeout: Duration,
    ) -> Self {
        Self {
            build,
            projects,
            diff_timeout,
        }
    }

    pub fn build_section(&self) -> &BuildSection {
        &self.build
    }

    pub fn projects(&self) -> &BTreeMap<ProjectId, ProjectConfig> {
        &self.projects
    }

    /// Parsed `[build].diff_timeout`.
    pub fn diff_timeout(&self) -> Duration {
        self.diff_timeout
    }

    pub fn root_project(&self) -> &str {
        &self.build.root_project
    }

    /// Effective namespace of a project, or `None` for unknown projects and
    /// projects without any group.
    pub fn project_group(&self, id: &str) -> Option<&str> {
        let project = self.projects.get(id)?;
        project.effective_group(self.build.group.as_deref())
    }
}
