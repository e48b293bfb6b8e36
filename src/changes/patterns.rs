// src/changes/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::BuildSection;

/// Compiled path classification rules from `[build]`.
///
/// Paths are matched relative to the build root with forward slashes, e.g.
/// `"gradle/libs.versions.toml"`.
#[derive(Clone)]
pub struct PathPatterns {
    build_files: Vec<String>,
    manifest_name: Option<String>,
    global_set: Option<GlobSet>,
    ignore_set: Option<GlobSet>,
}

impl fmt::Debug for PathPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPatterns")
            .field("build_files", &self.build_files)
            .field("manifest_name", &self.manifest_name)
            .finish_non_exhaustive()
    }
}

impl PathPatterns {
    /// Compile the patterns of a `[build]` section.
    pub fn from_build(build: &BuildSection) -> Result<Self> {
        let global_set = optional_globset(&build.global_files)
            .context("building global_files globset")?;
        let ignore_set = optional_globset(&build.ignore).context("building ignore globset")?;

        Ok(Self {
            build_files: build.build_files.clone(),
            manifest_name: None,
            global_set,
            ignore_set,
        })
    }

    /// Treat the manifest file itself as a global trigger when it sits at the
    /// build root under this name.
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = Some(name.into());
        self
    }

    /// True if `file_name` is one of the build-definition file names.
    pub fn is_build_file(&self, file_name: &str) -> bool {
        self.build_files.iter().any(|f| f == file_name)
    }

    /// True if a change to `rel_path` invalidates every project.
    pub fn is_global_trigger(&self, rel_path: &str) -> bool {
        if !rel_path.contains('/') {
            if self.is_build_file(rel_path) {
                return true;
            }
            if self.manifest_name.as_deref() == Some(rel_path) {
                return true;
            }
        }
        self.global_set
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }

    /// True if `rel_path` should never make a project dirty.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.ignore_set
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }
}

fn optional_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        Ok(None)
    } else {
        build_globset(patterns).map(Some)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
