// src/changes/path_utils.rs

//! Utility functions for normalising changed paths.

use std::path::Path;

/// Normalise a changed path as reported by version control into the
/// forward-slash, root-relative form the rest of the crate works with.
///
/// Returns `None` for paths that cannot belong to the build: empty strings,
/// absolute paths, and paths escaping the root through `..`.
pub fn normalize_rel_path(raw: &str) -> Option<String> {
    let mut s = raw.trim().replace('\\', "/");

    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }

    if s.is_empty() || s == "." || s.starts_with('/') || has_drive_prefix(&s) {
        return None;
    }

    let segments: Vec<&str> = s.split('/').filter(|seg| !seg.is_empty()).collect();
    if segments.is_empty() || segments.iter().any(|seg| *seg == "..") {
        return None;
    }

    Some(segments.join("/"))
}

/// First segment of an already normalised path.
pub fn first_segment(rel_path: &str) -> &str {
    rel_path.split('/').next().unwrap_or(rel_path)
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
/// - Only if both attempts fail do we give up.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        let s = rel.to_string_lossy().replace('\\', "/");
        return Some(s);
    }

    // Different absolute prefixes may point at the same directory
    // (symlinks, /private/var on macOS).
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            let s = rel.to_string_lossy().replace('\\', "/");
            return Some(s);
        }
    }

    None
}
