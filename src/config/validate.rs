// src/config/validate.rs

use std::collections::HashMap;

use tracing::warn;

use crate::changes::patterns::PathPatterns;
use crate::config::model::{Manifest, RawManifest};
use crate::errors::{AffectedError, Result};
use crate::types::parse_duration;

impl TryFrom<RawManifest> for Manifest {
    type Error = crate::errors::AffectedError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_raw_manifest(&raw)?;
        let diff_timeout = parse_diff_timeout(&raw)?;
        Ok(Manifest::new_unchecked(raw.build, raw.project, diff_timeout))
    }
}

fn validate_raw_manifest(raw: &RawManifest) -> Result<()> {
    ensure_has_projects(raw)?;
    validate_build_section(raw)?;
    validate_project_dirs(raw)?;
    validate_root_project(raw)?;
    validate_tasks(raw)?;
    Ok(())
}

fn ensure_has_projects(raw: &RawManifest) -> Result<()> {
    if raw.project.is_empty() {
        return Err(AffectedError::ConfigError(
            "manifest must contain at least one [project.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_build_section(raw: &RawManifest) -> Result<()> {
    let build = &raw.build;

    if build.root_project.trim().is_empty() {
        return Err(AffectedError::ConfigError(
            "[build].root_project must not be empty".to_string(),
        ));
    }

    if build.base.trim().is_empty() {
        return Err(AffectedError::ConfigError(
            "[build].base must not be empty".to_string(),
        ));
    }

    if build.build_files.is_empty() {
        return Err(AffectedError::ConfigError(
            "[build].build_files must list at least one file name".to_string(),
        ));
    }

    for name in build.build_files.iter() {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(AffectedError::ConfigError(format!(
                "[build].build_files entry '{}' must be a plain file name",
                name
            )));
        }
    }

    PathPatterns::from_build(build).map_err(|e| {
        AffectedError::ConfigError(format!("[build] contains an invalid glob: {e:#}"))
    })?;

    Ok(())
}

fn parse_diff_timeout(raw: &RawManifest) -> Result<std::time::Duration> {
    parse_duration(&raw.build.diff_timeout).map_err(|e| {
        AffectedError::ConfigError(format!("[build].diff_timeout: {e}"))
    })
}

fn validate_project_dirs(raw: &RawManifest) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for (id, project) in raw.project.iter() {
        let dir = project.effective_dir(id);

        if dir.is_empty() || dir.starts_with('/') || dir.split('/').any(|seg| seg == "..") {
            return Err(AffectedError::ConfigError(format!(
                "project '{}' has invalid dir '{}' (expected a path relative to the build root)",
                id, dir
            )));
        }

        if let Some(other) = seen.insert(dir, id.as_str()) {
            return Err(AffectedError::ConfigError(format!(
                "projects '{}' and '{}' share the same dir '{}'",
                other, id, dir
            )));
        }

        // Changed paths are attributed by their first segment only, so a
        // nested directory can never own a change.
        if dir != "." && dir.trim_end_matches('/').contains('/') {
            warn!(
                project = %id,
                dir = %dir,
                "project dir is nested; changes under it will not be attributed to the project"
            );
        }
    }

    Ok(())
}

/// The coordinating project owns the build root and is never mapped from
/// changed paths, so when declared it must sit at `.`.
fn validate_root_project(raw: &RawManifest) -> Result<()> {
    let root_id = raw.build.root_project.as_str();
    if let Some(project) = raw.project.get(root_id) {
        let dir = project.effective_dir(root_id);
        if dir != "." {
            return Err(AffectedError::ConfigError(format!(
                "root project '{}' must use dir \".\" (found '{}')",
                root_id, dir
            )));
        }
    }
    Ok(())
}

fn validate_tasks(raw: &RawManifest) -> Result<()> {
    for (id, project) in raw.project.iter() {
        for task in project.tasks.iter() {
            if task.trim().is_empty() || task.contains(':') {
                return Err(AffectedError::ConfigError(format!(
                    "project '{}' has invalid task name '{}'",
                    id, task
                )));
            }
        }
    }
    Ok(())
}
