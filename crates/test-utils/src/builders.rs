#![allow(dead_code)]

use std::collections::BTreeMap;

use affected::config::{BuildSection, DependencySpec, Manifest, ProjectConfig, RawManifest};

/// Builder for `Manifest` to simplify test setup.
pub struct ManifestBuilder {
    manifest: RawManifest,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            manifest: RawManifest {
                build: BuildSection::default(),
                project: BTreeMap::new(),
            },
        }
    }

    pub fn with_project(mut self, id: &str, project: ProjectConfig) -> Self {
        self.manifest.project.insert(id.to_string(), project);
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.manifest.build.group = Some(group.to_string());
        self
    }

    pub fn with_root_project(mut self, id: &str) -> Self {
        self.manifest.build.root_project = id.to_string();
        self
    }

    pub fn with_build_file(mut self, name: &str) -> Self {
        self.manifest.build.build_files.push(name.to_string());
        self
    }

    pub fn with_global_file(mut self, pattern: &str) -> Self {
        self.manifest.build.global_files.push(pattern.to_string());
        self
    }

    pub fn with_ignore(mut self, pattern: &str) -> Self {
        self.manifest.build.ignore.push(pattern.to_string());
        self
    }

    pub fn only_affected(mut self, val: bool) -> Self {
        self.manifest.build.only_affected = val;
        self
    }

    pub fn build_raw(self) -> RawManifest {
        self.manifest
    }

    pub fn build(self) -> Manifest {
        Manifest::try_from(self.manifest).expect("Failed to build valid manifest from builder")
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProjectConfig`.
pub struct ProjectBuilder {
    project: ProjectConfig,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            project: ProjectConfig {
                dir: None,
                group: None,
                tasks: vec![],
                dependencies: vec![],
            },
        }
    }

    pub fn dir(mut self, dir: &str) -> Self {
        self.project.dir = Some(dir.to_string());
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.project.group = Some(group.to_string());
        self
    }

    pub fn task(mut self, name: &str) -> Self {
        self.project.tasks.push(name.to_string());
        self
    }

    /// `{ project = "<id>" }`
    pub fn depends_on(mut self, id: &str) -> Self {
        self.project.dependencies.push(DependencySpec::Project {
            project: id.to_string(),
        });
        self
    }

    /// `{ group = "...", name = "...", version = "..." }`
    pub fn artifact(mut self, group: &str, name: &str, version: Option<&str>) -> Self {
        self.project.dependencies.push(DependencySpec::Artifact {
            group: group.to_string(),
            name: name.to_string(),
            version: version.map(|v| v.to_string()),
        });
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.project
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The three-project build used throughout the tests:
///
/// - `app` depends on `number-utils` and `string-utils`
/// - `root` coordinates, with dir `.`
pub fn sample_manifest() -> ManifestBuilder {
    ManifestBuilder::new()
        .with_group("com.example")
        .with_project("root", ProjectBuilder::new().dir(".").task("checkAll").build())
        .with_project(
            "app",
            ProjectBuilder::new()
                .task("check")
                .task("run")
                .depends_on("number-utils")
                .artifact("com.example", "string-utils", None)
                .artifact("org.junit", "junit", Some("4.13"))
                .build(),
        )
        .with_project("number-utils", ProjectBuilder::new().task("check").build())
        .with_project("string-utils", ProjectBuilder::new().task("check").build())
}
