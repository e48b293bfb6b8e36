mod common;
use crate::common::{init_tracing, mock_build_root, set, with_timeout};

use affected::engine::Engine;
use affected::graph::UnresolvedDependency;
use affected_test_utils::builders::{ProjectBuilder, sample_manifest};
use affected_test_utils::scripted_diff::ScriptedDiff;

fn sample_engine() -> Engine {
    let manifest = sample_manifest().only_affected(true).build();
    let fs = mock_build_root(&["app", "number-utils", "string-utils"]);
    Engine::new(manifest, ".", fs, Some("Affected.toml")).expect("engine")
}

#[test]
fn reverse_graph_matches_sample() {
    init_tracing();
    let engine = sample_engine();
    let graph = engine.graph();

    assert_eq!(graph.dependents_of("number-utils"), &set(&["app"]));
    assert_eq!(graph.dependents_of("string-utils"), &set(&["app"]));
    assert!(graph.dependents_of("app").is_empty());
    assert!(graph.dependents_of("root").is_empty());
    // junit is external and not part of the graph.
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.unresolved().is_empty());
}

#[tokio::test]
async fn source_change_affects_dependents() {
    with_timeout(async {
        init_tracing();
        let engine = sample_engine();
        let diff = ScriptedDiff::changed(["number-utils/src/main/kotlin/Numbers.kt"]);

        let report = engine.evaluate(&diff).await;

        assert_eq!(diff.calls(), 1);
        assert_eq!(report.changed, set(&["number-utils"]));
        assert_eq!(report.affected, set(&["app", "number-utils"]));
        assert_eq!(report.global_trigger, None);
        assert_eq!(
            report.included_tasks(),
            vec![":app:check", ":app:run", ":number-utils:check", ":checkAll"]
        );
    })
    .await
}

#[tokio::test]
async fn root_build_file_invalidates_everything() {
    with_timeout(async {
        init_tracing();
        let engine = sample_engine();
        let diff = ScriptedDiff::changed(["build.gradle.kts", "app/src/Main.kt"]);

        let report = engine.evaluate(&diff).await;

        assert_eq!(report.global_trigger.as_deref(), Some("build.gradle.kts"));
        assert_eq!(
            report.affected,
            set(&["app", "number-utils", "root", "string-utils"])
        );
        assert!(report.tasks.iter().all(|d| d.included));
    })
    .await
}

#[tokio::test]
async fn manifest_change_invalidates_everything() {
    with_timeout(async {
        let engine = sample_engine();
        let report = engine.evaluate(&ScriptedDiff::changed(["Affected.toml"])).await;
        assert_eq!(report.global_trigger.as_deref(), Some("Affected.toml"));
        assert_eq!(report.affected.len(), 4);
    })
    .await
}

#[tokio::test]
async fn unavailable_diff_selects_nothing_but_root() {
    with_timeout(async {
        init_tracing();
        let engine = sample_engine();
        let diff = ScriptedDiff::unavailable("fatal: bad revision 'nope'");

        let report = engine.evaluate(&diff).await;

        assert!(report.changed.is_empty());
        assert!(report.affected.is_empty());
        assert_eq!(
            report.diff_unavailable.as_deref(),
            Some("fatal: bad revision 'nope'")
        );
        assert_eq!(report.included_tasks(), vec![":checkAll"]);
    })
    .await
}

#[tokio::test]
async fn unmapped_paths_are_dropped() {
    with_timeout(async {
        let engine = sample_engine();
        let diff = ScriptedDiff::changed(["README.md", "docs/index.md", "", "../elsewhere/x"]);

        let report = engine.evaluate(&diff).await;

        assert!(report.changed.is_empty());
        assert!(report.affected.is_empty());
        assert_eq!(report.changed_files, vec!["README.md", "docs/index.md"]);
    })
    .await
}

#[tokio::test]
async fn gating_off_runs_every_task() {
    with_timeout(async {
        let manifest = sample_manifest().build();
        let fs = mock_build_root(&["app", "number-utils", "string-utils"]);
        let engine = Engine::new(manifest, ".", fs, None).unwrap();

        let report = engine.evaluate(&ScriptedDiff::changed(["app/src/Main.kt"])).await;

        assert!(!report.only_affected);
        assert_eq!(report.affected, set(&["app"]));
        assert!(report.tasks.iter().all(|d| d.included));

        let gated = engine.with_only_affected(true);
        let report = gated.evaluate(&ScriptedDiff::changed(["app/src/Main.kt"])).await;
        assert_eq!(report.included_tasks(), vec![":app:check", ":app:run", ":checkAll"]);
    })
    .await
}

#[tokio::test]
async fn ignored_and_global_globs() {
    with_timeout(async {
        let manifest = sample_manifest()
            .with_ignore("**/*.md")
            .with_global_file("gradle/*.toml")
            .build();
        let fs = mock_build_root(&["app", "number-utils", "string-utils"]);
        let engine = Engine::new(manifest, ".", fs, None).unwrap();

        let report = engine.evaluate(&ScriptedDiff::changed(["string-utils/README.md"])).await;
        assert!(report.affected.is_empty());

        let report = engine
            .evaluate(&ScriptedDiff::changed(["gradle/libs.versions.toml"]))
            .await;
        assert_eq!(report.global_trigger.as_deref(), Some("gradle/libs.versions.toml"));
        assert_eq!(report.affected.len(), 4);
    })
    .await
}

#[tokio::test]
async fn unresolved_dependency_is_reported_not_fatal() {
    with_timeout(async {
        let manifest = sample_manifest()
            .with_project(
                "cli",
                ProjectBuilder::new()
                    .task("check")
                    .depends_on("app")
                    .artifact("com.example", "ghost-utils", None)
                    .build(),
            )
            .build();
        let fs = mock_build_root(&["app", "cli", "number-utils", "string-utils"]);
        let engine = Engine::new(manifest, ".", fs, None).unwrap();

        assert_eq!(
            engine.graph().unresolved(),
            &[UnresolvedDependency {
                declared_by: "cli".to_string(),
                declaration: "com.example:ghost-utils".to_string(),
                reason: "group 'com.example' belongs to this build but no project is named 'ghost-utils'"
                    .to_string(),
            }]
        );

        let report = engine
            .evaluate(&ScriptedDiff::changed(["string-utils/src/Strings.kt"]))
            .await;
        assert_eq!(report.affected, set(&["app", "cli", "string-utils"]));
        assert_eq!(report.unresolved.len(), 1);
    })
    .await
}
