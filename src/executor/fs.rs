//! Filesystem helpers shared by the executor and [`SystemFileSystemOps`].
//!
//! [`SystemFileSystemOps`]: crate::operations::SystemFileSystemOps
use std::io;
use std::path::{Component, Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Join a `/`-separated relative path onto `root`, dropping `.` segments.
///
/// Manifest paths always use `/`; this keeps them portable on Windows.
#[must_use]
pub fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            other => path.push(other),
        }
    }
    path
}

/// `path` relative to `root`, or `path` itself when it is outside `root`.
#[must_use]
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
