// src/lib.rs

pub mod changes;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod gate;
pub mod graph;
pub mod logging;
pub mod report;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::changes::path_utils::relative_str;
use crate::changes::{DiffSource, GitDiff, StaticDiff};
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::engine::Engine;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest loading
/// - graph construction
/// - changeset collection (git or `--files`)
/// - affected-set computation and task gating
/// - report output on stdout
pub async fn run(args: CliArgs) -> Result<()> {
    let manifest_path = PathBuf::from(&args.config);
    let manifest = load_and_validate(&manifest_path)?;
    let root = manifest_root_dir(&manifest_path);

    let manifest_name = manifest_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let mut engine = Engine::new(manifest, root.clone(), fs, manifest_name.as_deref())?;
    if args.only_affected {
        engine = engine.with_only_affected(true);
    }

    if args.dry_run {
        print_dry_run(&engine);
        return Ok(());
    }

    let source = diff_source(&args, &engine, &root);
    let report = engine.evaluate(&*source).await;

    info!(
        changed = report.changed.len(),
        affected = report.affected.len(),
        tasks_included = report.included_tasks().len(),
        "evaluation complete"
    );

    println!("{}", report.render(args.format)?);
    Ok(())
}

/// Pick the changeset source: explicit `--files`, otherwise `git diff`.
fn diff_source(args: &CliArgs, engine: &Engine, root: &Path) -> Box<dyn DiffSource> {
    if let Some(files) = &args.files {
        let abs_root = absolute_root(root);
        let files: Vec<String> = files.iter().map(|f| root_relative(&abs_root, f)).collect();
        debug!(?files, "using changed files from the command line");
        return Box::new(StaticDiff::new(files));
    }

    let build = engine.manifest().build_section();
    let base = args.base.clone().unwrap_or_else(|| build.base.clone());
    let mut git = GitDiff::new(root.to_path_buf(), base, engine.manifest().diff_timeout());
    if let Some(head) = &args.head {
        git = git.with_head(head.clone());
    }
    Box::new(git)
}

/// `root` anchored at the current directory if it is relative.
fn absolute_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return root.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(_) => root.to_path_buf(),
    }
}

/// Absolute `--files` entries are made relative to the (absolute) build
/// root; entries outside the root are passed on unchanged and later dropped
/// as malformed.
fn root_relative(root: &Path, file: &str) -> String {
    let path = Path::new(file);
    if !path.is_absolute() {
        return file.to_string();
    }
    match relative_str(root, path) {
        Some(rel) => rel,
        None => {
            warn!(file = %file, "changed file is outside the build root");
            file.to_string()
        }
    }
}

/// Figure out the build root.
///
/// - If the manifest path has a non-empty parent (e.g. "build/Affected.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Affected.toml" (parent = ""),
///   we fall back to the current working directory "."
fn manifest_root_dir(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Dry-run output: projects, edges, tasks and graph diagnostics.
fn print_dry_run(engine: &Engine) {
    let manifest = engine.manifest();
    let build = manifest.build_section();
    let graph = engine.graph();

    println!("affected dry-run");
    println!("  build.root_project = {}", build.root_project);
    println!("  build.base = {}", build.base);
    println!("  build.build_files = {:?}", build.build_files);
    println!("  build.only_affected = {}", build.only_affected);
    println!("  build.diff_timeout = {:?}", manifest.diff_timeout());
    if let Some(group) = &build.group {
        println!("  build.group = {group}");
    }
    println!();

    println!("projects ({}):", graph.len());
    for (id, project) in manifest.projects().iter() {
        println!("  - {id}");
        println!("      dir: {}", project.effective_dir(id));
        let deps = graph.dependencies_of(id);
        if !deps.is_empty() {
            println!("      depends on: {:?}", deps);
        }
        let dependents = graph.dependents_of(id);
        if !dependents.is_empty() {
            println!("      dependents: {:?}", dependents);
        }
        if !project.tasks.is_empty() {
            println!("      tasks: {:?}", project.tasks);
        }
    }

    if !graph.unresolved().is_empty() {
        println!();
        println!("unresolved dependencies:");
        for u in graph.unresolved() {
            println!("  - {u}");
        }
    }

    let cycles = graph.cycles();
    if !cycles.is_empty() {
        println!();
        println!("dependency cycles:");
        for cycle in cycles {
            println!("  - {}", cycle.join(" <-> "));
        }
    }

    match engine.resolver().undeclared_project_dirs() {
        Ok(dirs) if !dirs.is_empty() => {
            println!();
            println!("directories with a build file but no [project] entry:");
            for dir in dirs {
                println!("  - {dir}");
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "could not scan build root for undeclared projects"),
    }

    debug!("dry-run complete (no changeset inspected)");
}
