// src/graph/dependency.rs

//! Resolution of manifest dependency declarations.

use std::fmt;

use serde::Serialize;

use crate::config::model::{DependencySpec, Manifest};
use crate::types::ProjectId;

/// A dependency declaration after resolution.
///
/// Produced once while building the graph; nothing downstream looks at the
/// raw [`DependencySpec`] again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDependency {
    /// Another project of this build.
    InternalProjectRef(ProjectId),
    /// Anything else. Irrelevant to the affected set.
    ExternalArtifactRef {
        namespace: String,
        name: String,
        version: Option<String>,
    },
}

/// A declaration that points inside the build but at no known project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDependency {
    /// Project whose manifest entry carries the declaration.
    pub declared_by: ProjectId,
    /// The declaration as written, e.g. `project:utils` or `com.example:utils`.
    pub declaration: String,
    pub reason: String,
}

impl fmt::Display for UnresolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.declared_by, self.declaration, self.reason
        )
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencySpec::Project { project } => write!(f, "project:{project}"),
            DependencySpec::Artifact {
                group,
                name,
                version: Some(version),
            } => write!(f, "{group}:{name}:{version}"),
            DependencySpec::Artifact { group, name, .. } => write!(f, "{group}:{name}"),
        }
    }
}

/// Resolve one declaration of project `declared_by`.
///
/// - `{ project = id }` must name a known project.
/// - `{ group, name }` is internal when some project has identifier or
///   directory `name` and effective group `group`; it is unresolvable when
///   `group` is the namespace of any project of the build but nothing
///   matches; otherwise it is an external artifact.
pub fn resolve_dependency(
    manifest: &Manifest,
    declared_by: &str,
    spec: &DependencySpec,
) -> Result<ResolvedDependency, UnresolvedDependency> {
    let unresolved = |reason: String| UnresolvedDependency {
        declared_by: declared_by.to_string(),
        declaration: spec.to_string(),
        reason,
    };

    match spec {
        DependencySpec::Project { project } => {
            if manifest.projects().contains_key(project) {
                Ok(ResolvedDependency::InternalProjectRef(project.clone()))
            } else {
                Err(unresolved(format!("no project '{project}' in this build")))
            }
        }
        DependencySpec::Artifact {
            group,
            name,
            version,
        } => {
            if let Some(target) = find_internal(manifest, group, name) {
                return Ok(ResolvedDependency::InternalProjectRef(target.clone()));
            }

            let group_is_internal = manifest
                .projects()
                .keys()
                .any(|id| manifest.project_group(id) == Some(group.as_str()));

            if group_is_internal {
                Err(unresolved(format!(
                    "group '{group}' belongs to this build but no project is named '{name}'"
                )))
            } else {
                Ok(ResolvedDependency::ExternalArtifactRef {
                    namespace: group.clone(),
                    name: name.clone(),
                    version: version.clone(),
                })
            }
        }
    }
}

fn find_internal<'a>(manifest: &'a Manifest, group: &str, name: &str) -> Option<&'a ProjectId> {
    let in_group = |id: &str| manifest.project_group(id) == Some(group);

    // Identifier matches take precedence over directory matches.
    if let Some((id, _)) = manifest.projects().get_key_value(name) {
        if in_group(id.as_str()) {
            return Some(id);
        }
    }

    manifest
        .projects()
        .iter()
        .find(|(id, project)| project.effective_dir(id.as_str()) == name && in_group(id.as_str()))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::model::{BuildSection, ProjectConfig, RawManifest};

    fn manifest() -> Manifest {
        let mut project = BTreeMap::new();
        project.insert("app".to_string(), ProjectConfig::default());
        project.insert(
            "number-utils".to_string(),
            ProjectConfig {
                dir: Some("numbers".to_string()),
                ..ProjectConfig::default()
            },
        );
        project.insert(
            "tools".to_string(),
            ProjectConfig {
                group: Some("com.example.tools".to_string()),
                ..ProjectConfig::default()
            },
        );

        Manifest::try_from(RawManifest {
            build: BuildSection {
                group: Some("com.example".to_string()),
                ..BuildSection::default()
            },
            project,
        })
        .unwrap()
    }

    fn artifact(group: &str, name: &str) -> DependencySpec {
        DependencySpec::Artifact {
            group: group.to_string(),
            name: name.to_string(),
            version: None,
        }
    }

    #[test]
    fn project_reference_resolves_to_internal() {
        let m = manifest();
        let spec = DependencySpec::Project {
            project: "number-utils".to_string(),
        };
        assert_eq!(
            resolve_dependency(&m, "app", &spec),
            Ok(ResolvedDependency::InternalProjectRef("number-utils".to_string()))
        );
    }

    #[test]
    fn unknown_project_reference_is_unresolved() {
        let m = manifest();
        let spec = DependencySpec::Project {
            project: "ghost".to_string(),
        };
        let err = resolve_dependency(&m, "app", &spec).unwrap_err();
        assert_eq!(err.declared_by, "app");
        assert_eq!(err.declaration, "project:ghost");
    }

    #[test]
    fn artifact_in_build_group_matches_id_or_dir() {
        let m = manifest();
        assert_eq!(
            resolve_dependency(&m, "app", &artifact("com.example", "number-utils")),
            Ok(ResolvedDependency::InternalProjectRef("number-utils".to_string()))
        );
        assert_eq!(
            resolve_dependency(&m, "app", &artifact("com.example", "numbers")),
            Ok(ResolvedDependency::InternalProjectRef("number-utils".to_string()))
        );
        assert_eq!(
            resolve_dependency(&m, "app", &artifact("com.example.tools", "tools")),
            Ok(ResolvedDependency::InternalProjectRef("tools".to_string()))
        );
    }

    #[test]
    fn group_must_match_project_group() {
        let m = manifest();
        // `tools` lives in its own group.
        let err = resolve_dependency(&m, "app", &artifact("com.example", "tools")).unwrap_err();
        assert!(err.reason.contains("no project is named 'tools'"));
    }

    #[test]
    fn foreign_group_is_external() {
        let m = manifest();
        let spec = DependencySpec::Artifact {
            group: "org.junit".to_string(),
            name: "junit".to_string(),
            version: Some("4.13".to_string()),
        };
        assert_eq!(
            resolve_dependency(&m, "app", &spec),
            Ok(ResolvedDependency::ExternalArtifactRef {
                namespace: "org.junit".to_string(),
                name: "junit".to_string(),
                version: Some("4.13".to_string()),
            })
        );
        assert_eq!(spec.to_string(), "org.junit:junit:4.13");
    }
}
