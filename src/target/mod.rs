//! Target directory resolution.
//!
//! The target must be absent or an empty directory when the pipeline
//! starts. An empty directory is removed so acquisition can recreate it;
//! anything else stops the run before a single write happens.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, StarterError};
use crate::fs::Filesystem;

/// Resolve a (possibly relative) where-input against `cwd`.
///
/// The result is absolute and lexically normalized: `.` components are
/// dropped and `..` pops the previous component. Symlinks are not resolved
/// since the path usually does not exist yet.
pub fn resolve(where_input: &str, cwd: &Path) -> PathBuf {
    let input = Path::new(where_input);
    let joined = if input.is_absolute() {
        input.to_path_buf()
    } else {
        cwd.join(input)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root.
                if !matches!(
                    result.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    result.pop();
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Make sure `path` can be created by acquisition.
///
/// # Errors
///
/// Returns `DirectoryNotEmpty` if the directory has entries and
/// `InvalidTarget` if something other than a directory is in the way.
pub fn ensure_clearable(path: &Path, fs: &dyn Filesystem) -> Result<()> {
    if !fs.exists(path) {
        return Ok(());
    }

    if !fs.is_dir(path) {
        return Err(StarterError::InvalidTarget {
            path: path.to_path_buf(),
        });
    }

    if fs.is_empty_dir(path)? {
        tracing::debug!("Removing empty target directory {}", path.display());
        fs.remove_dir(path)?;
        Ok(())
    } else {
        Err(StarterError::DirectoryNotEmpty {
            path: path.to_path_buf(),
        })
    }
}

/// Render `path` relative to `cwd` for the closing `cd` hint.
///
/// Both paths are compared lexically; a path outside `cwd` climbs with
/// `..`. Paths on different roots are shown as-is.
pub fn display_relative(path: &Path, cwd: &Path) -> String {
    let path_parts: Vec<Component> = path.components().collect();
    let cwd_parts: Vec<Component> = cwd.components().collect();

    if path_parts.first() != cwd_parts.first() {
        return path.display().to_string();
    }

    let shared = path_parts
        .iter()
        .zip(&cwd_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..cwd_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[shared..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.display().to_string()
    }
}
