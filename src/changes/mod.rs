// src/changes/mod.rs

//! Change detection.
//!
//! This module is responsible for:
//! - Obtaining the list of changed paths (`git diff` or an explicit list).
//! - Classifying paths: global triggers, ignored paths, project sources.
//! - Mapping project sources onto their owning project.
//!
//! It does **not** know about dependents; turning changed projects into the
//! affected set is the job of [`crate::graph::solver`].

pub mod collector;
pub mod diff;
pub mod path_utils;
pub mod patterns;
pub mod resolver;

pub use collector::{ChangeSet, changed_projects, collect_changes};
pub use diff::{DiffOutcome, DiffSource, GitDiff, StaticDiff};
pub use patterns::PathPatterns;
pub use resolver::ProjectResolver;
