// src/config/mod.rs

//! Build manifest loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a manifest from disk (`loader.rs`).
//! - Validate the invariants the graph builder and collector rely on
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_MANIFEST_NAME, load_and_validate, load_from_path};
pub use model::{BuildSection, DependencySpec, Manifest, ProjectConfig, RawManifest};
