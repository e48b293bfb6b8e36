// src/graph/mod.rs

//! Project dependency graph and affected-set computation.
//!
//! - [`dependency`] resolves manifest declarations into internal project
//!   references or external artifacts.
//! - [`builder`] holds the immutable [`ProjectGraph`] with both the forward
//!   and the reverse (dependent-of) adjacency.
//! - [`solver`] computes the closure of a changed set over the reverse graph.

pub mod builder;
pub mod dependency;
pub mod solver;

pub use builder::ProjectGraph;
pub use dependency::{ResolvedDependency, UnresolvedDependency, resolve_dependency};
pub use solver::affected_projects;
