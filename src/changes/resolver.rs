// src/changes/resolver.rs

//! Changed path → owning project.
//!
//! Only the first path segment is consulted: `app/src/Main.kt` belongs to the
//! project whose `dir` is `app`, provided `app/` still contains one of the
//! build-definition files. Nested project layouts are not resolved.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::changes::path_utils::{first_segment, normalize_rel_path};
use crate::config::model::Manifest;
use crate::fs::FileSystem;
use crate::types::ProjectId;

#[derive(Debug, Clone)]
pub struct ProjectResolver {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    build_files: Vec<String>,
    /// Top-level directory name → project identifier.
    dir_to_project: HashMap<String, ProjectId>,
}

impl ProjectResolver {
    pub fn from_manifest(manifest: &Manifest, root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        let dir_to_project = manifest
            .projects()
            .iter()
            .map(|(id, project)| {
                let dir = project.effective_dir(id).trim_end_matches('/').to_string();
                (dir, id.clone())
            })
            .collect();

        Self {
            root: root.into(),
            fs,
            build_files: manifest.build_section().build_files.clone(),
            dir_to_project,
        }
    }

    /// Return the project owning `path`, or `None` if no project claims it.
    ///
    /// Never fails: malformed paths, files at the build root and directories
    /// without a build-definition file simply have no owner.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let rel = normalize_rel_path(path)?;
        if !rel.contains('/') {
            return None;
        }

        let segment = first_segment(&rel);
        if !self.claims(segment) {
            debug!(path = %rel, dir = %segment, "directory has no build file; path unowned");
            return None;
        }

        self.dir_to_project.get(segment).map(|id| id.as_str())
    }

    /// True if `<root>/<dir>` directly contains a build-definition file.
    fn claims(&self, dir: &str) -> bool {
        let dir_path = self.root.join(dir);
        self.build_files
            .iter()
            .any(|name| self.fs.is_file(&dir_path.join(name)))
    }

    /// Top-level directories that carry a build-definition file but are not
    /// the `dir` of any declared project. Changes under them are never
    /// attributed to anything.
    pub fn undeclared_project_dirs(&self) -> Result<Vec<String>> {
        let mut dirs = Vec::new();

        for entry in self.fs.read_dir(&self.root)? {
            if !self.fs.is_dir(&entry) {
                continue;
            }
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') || self.dir_to_project.contains_key(name) {
                continue;
            }
            if self.claims(name) {
                dirs.push(name.to_string());
            }
        }

        dirs.sort();
        Ok(dirs)
    }
}
