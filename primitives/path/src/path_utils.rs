// SPDX-License-Identifier: CC0-1.0

//! Path utility functions for finding the project root and resolving pipeline paths.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Name of the optional pipeline configuration file at the project root.
pub const CONFIG_FILE_NAME: &str = "linegen.toml";

/// Hidden directory the generator keeps its bookkeeping in.
pub const MANIFEST_DIR: &str = ".openapi-generator";

/// File listing every path the generator produced, one per line.
pub const MANIFEST_FILE: &str = "FILES";

/// Directories whose joint presence marks a project root without a config file.
const ROOT_MARKER_DIRS: &[&str] = &["generator", "line-openapi"];

/// Errors raised while resolving pipeline paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// The current directory could not be determined.
    #[error("Failed to read current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
    /// No ancestor of the start directory looks like a project root.
    #[error(
        "Could not find project root above {} (no linegen.toml, generator/ or line-openapi/ found)",
        .0.display()
    )]
    RootNotFound(PathBuf),
}

/// Find the project root, starting from the current directory.
pub fn find_project_root() -> Result<PathBuf, PathError> {
    let current = std::env::current_dir()?;
    find_project_root_from(&current)
}

/// Find the project root by walking up from `start`.
///
/// A directory is the root when it holds a `linegen.toml`, or when it holds both
/// the generator build workspace and the specification directory.
pub fn find_project_root_from(start: &Path) -> Result<PathBuf, PathError> {
    let mut current = start.to_path_buf();
    loop {
        if is_project_root(&current) {
            return Ok(current);
        }
        if !current.pop() {
            return Err(PathError::RootNotFound(start.to_path_buf()));
        }
    }
}

fn is_project_root(dir: &Path) -> bool {
    dir.join(CONFIG_FILE_NAME).is_file() || ROOT_MARKER_DIRS.iter().all(|d| dir.join(d).is_dir())
}

/// Location of the generator manifest for `output_dir`.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_DIR).join(MANIFEST_FILE)
}

/// Interpret a manifest entry as a path that cannot escape its output directory.
///
/// Returns `None` for empty entries, absolute paths, and paths containing `..`.
pub fn contained_relative_path(entry: &str) -> Option<PathBuf> {
    if entry.trim().is_empty() {
        return None;
    }
    let path = Path::new(entry);
    let mut normal_components = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal_components += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    // "." or "./" would name the output directory itself
    if normal_components == 0 {
        return None;
    }
    Some(path.to_path_buf())
}

/// Whether `relative` still lands inside `root` once symlinks are resolved.
///
/// Only the parent of the target is resolved: removing a symlink removes the link,
/// not what it points to. Paths whose parent does not exist cannot reach anything
/// and count as contained.
pub fn resolves_within(root: &Path, relative: &Path) -> bool {
    let target = root.join(relative);
    let Some(parent) = target.parent() else {
        return false;
    };
    match (root.canonicalize(), parent.canonicalize()) {
        (Ok(root), Ok(parent)) => parent.starts_with(root),
        _ => true,
    }
}

/// Quote `text` for a POSIX shell, unless it only contains safe characters.
pub fn shell_quote(text: &str) -> String {
    let safe = !text.is_empty()
        && text.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}
