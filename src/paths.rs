//! Source path normalization.
//!
//! A source's identifier is its path with a leading `~` expanded to the user's
//! home directory and `.`/`..` components resolved lexically. This is pure path
//! manipulation with no filesystem I/O, so a missing file still gets a stable
//! identifier (and a `NotFound` error later). Identifiers are only compared,
//! never opened: a `..` after a symlink resolves differently on disk.

use std::path::{Component, Path, PathBuf};

/// Identifier under which a source is tracked as loaded.
pub fn source_id(path: &Path) -> PathBuf {
    normalize_path_components(&expand_home(path))
}

/// Expand a leading `~` to the user's home directory.
/// Paths without `~`, or when no home directory is known, are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    if let Some(Component::Normal(first)) = components.next()
        && first.to_str() == Some("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(components.as_path());
    }
    path.to_path_buf()
}

/// Normalize path components without requiring the file to exist.
/// Handles `.` and `..` components.
fn normalize_path_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => components.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else {
                    // `..` above a relative start or the root is kept as written
                    components.push(Component::ParentDir);
                }
            }
            Component::Normal(_) => components.push(component),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}
