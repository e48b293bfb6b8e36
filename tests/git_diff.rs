mod common;

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use affected::changes::{DiffOutcome, DiffSource, GitDiff};
use affected::config::load_and_validate;
use affected::engine::Engine;
use affected::fs::RealFileSystem;

const MANIFEST: &str = r#"
[build]
base = "HEAD"
only_affected = true

[project.root]
dir = "."
tasks = ["checkAll"]

[project.app]
tasks = ["check"]
dependencies = [{ project = "lib" }]

[project.lib]
tasks = ["check"]
"#;

fn git(root: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A committed two-project build, or `None` when git is not installed.
fn committed_build() -> Option<TempDir> {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    if !git(root, &["init", "-q"]) {
        eprintln!("git not available; skipping");
        return None;
    }
    git(root, &["config", "user.email", "dev@example.com"]);
    git(root, &["config", "user.name", "Dev"]);
    git(root, &["config", "commit.gpgsign", "false"]);

    write(root, "Affected.toml", MANIFEST);
    write(root, "build.gradle.kts", "");
    write(root, "app/build.gradle.kts", "");
    write(root, "app/src/Main.kt", "fun main() {}\n");
    write(root, "lib/build.gradle.kts", "");
    write(root, "lib/src/Lib.kt", "fun lib() = 1\n");

    assert!(git(root, &["add", "."]));
    assert!(git(root, &["commit", "-q", "-m", "initial"]));
    Some(dir)
}

#[tokio::test]
async fn working_tree_edit_shows_up_in_diff() {
    common::init_tracing();
    let Some(dir) = committed_build() else { return };
    write(dir.path(), "lib/src/Lib.kt", "fun lib() = 2\n");

    let diff = GitDiff::new(dir.path(), "HEAD", Duration::from_secs(30));
    assert_eq!(
        diff.changed_paths().await,
        DiffOutcome::Changed(vec!["lib/src/Lib.kt".to_string()])
    );
}

#[tokio::test]
async fn unknown_base_is_unavailable() {
    let Some(dir) = committed_build() else { return };

    let diff = GitDiff::new(dir.path(), "no-such-ref", Duration::from_secs(30));
    match diff.changed_paths().await {
        DiffOutcome::Unavailable(reason) => assert!(reason.contains("exited with")),
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

fn engine_for(root: &Path) -> (Engine, Duration) {
    let manifest = load_and_validate(root.join("Affected.toml")).unwrap();
    let timeout = manifest.diff_timeout();
    let engine = Engine::new(manifest, root, Arc::new(RealFileSystem), Some("Affected.toml")).unwrap();
    (engine, timeout)
}

#[tokio::test]
async fn non_ascii_file_name_maps_to_its_project() {
    common::init_tracing();
    let Some(dir) = committed_build() else { return };
    let root = dir.path();
    write(root, "app/src/Café.kt", "val x = 1\n");
    assert!(git(root, &["add", "."]));
    assert!(git(root, &["commit", "-q", "-m", "add café"]));
    write(root, "app/src/Café.kt", "val x = 2\n");

    let (engine, timeout) = engine_for(root);
    let report = engine.evaluate(&GitDiff::new(root, "HEAD", timeout)).await;

    assert_eq!(report.changed_files, vec!["app/src/Café.kt"]);
    assert_eq!(report.changed, common::set(&["app"]));
}

#[tokio::test]
async fn file_moved_between_projects_changes_both() {
    common::init_tracing();
    let Some(dir) = committed_build() else { return };
    let root = dir.path();
    write(root, "lib/src/Moved.kt", "fun moved() = 1\n");
    assert!(git(root, &["add", "."]));
    assert!(git(root, &["commit", "-q", "-m", "add moved"]));
    assert!(git(root, &["mv", "lib/src/Moved.kt", "app/src/Moved.kt"]));

    let (engine, timeout) = engine_for(root);
    let report = engine.evaluate(&GitDiff::new(root, "HEAD", timeout)).await;

    assert_eq!(report.changed_files, vec!["app/src/Moved.kt", "lib/src/Moved.kt"]);
    assert_eq!(report.changed, common::set(&["app", "lib"]));
    assert_eq!(report.affected, common::set(&["app", "lib"]));
}

#[cfg(unix)]
#[tokio::test]
async fn slow_diff_times_out_as_unavailable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("slow-vcs");
    fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let diff = GitDiff::new(dir.path(), "main", Duration::from_millis(200))
        .with_program(script.to_string_lossy());

    let started = Instant::now();
    let outcome = diff.changed_paths().await;

    match outcome {
        DiffOutcome::Unavailable(reason) => assert!(reason.contains("timed out after 200ms")),
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn real_build_end_to_end() {
    common::init_tracing();
    let Some(dir) = committed_build() else { return };
    let root = dir.path();
    write(root, "lib/src/Lib.kt", "fun lib() = 3\n");

    let (engine, timeout) = engine_for(root);
    let diff = GitDiff::new(root, "HEAD", timeout);
    let report = engine.evaluate(&diff).await;

    assert_eq!(report.changed, common::set(&["lib"]));
    assert_eq!(report.affected, common::set(&["app", "lib"]));
    assert_eq!(
        report.included_tasks(),
        vec![":app:check", ":lib:check", ":checkAll"]
    );
}
