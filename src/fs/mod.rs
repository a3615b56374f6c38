//! Filesystem access.
//!
//! The pipeline and setup routines touch the disk only through the
//! [`Filesystem`] trait so tests can observe (or forbid) mutation.
//! [`LocalFilesystem`] is the real implementation.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

/// Filesystem primitives used by the pipeline and handed to setup routines.
///
/// Every operation is synchronous and propagates failures.
pub trait Filesystem {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` is a directory without entries.
    fn is_empty_dir(&self, path: &Path) -> Result<bool>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    /// Remove a file or a directory tree.
    fn remove_all(&self, path: &Path) -> Result<()>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read a file's bytes.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, replacing any existing content.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Copy the contents of `from` into `to`, creating `to` if needed.
    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()>;
}

/// [`Filesystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a local filesystem handle.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir(path)?;
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        // Symlinks are removed, never followed.
        let meta = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if meta.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::create_dir_all(to)?;
        for entry in WalkDir::new(from).min_depth(1) {
            let entry = entry.map_err(|e| anyhow::anyhow!(e))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| anyhow::anyhow!(e))?;
            let dest = to.join(relative);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(entry.path(), &dest)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_dir_detection() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        assert!(fs.is_empty_dir(temp.path()).unwrap());

        std::fs::write(temp.path().join("file.txt"), "x").unwrap();
        assert!(!fs.is_empty_dir(temp.path()).unwrap());
    }

    #[test]
    fn is_empty_dir_fails_for_missing_path() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        assert!(fs.is_empty_dir(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn remove_all_handles_files_dirs_and_missing() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        let file = temp.path().join("a.txt");
        std::fs::write(&file, "a").unwrap();
        let dir = temp.path().join("nested/deeper");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.txt"), "b").unwrap();

        fs.remove_all(&file).unwrap();
        fs.remove_all(&temp.path().join("nested")).unwrap();
        fs.remove_all(&temp.path().join("never-existed")).unwrap();

        assert!(!file.exists());
        assert!(!temp.path().join("nested").exists());
    }

    #[test]
    fn write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        let path = temp.path().join("x/y/z.txt");
        fs.write(&path, b"hello").unwrap();

        assert_eq!(fs.read(&path).unwrap(), b"hello");
    }

    #[test]
    fn copy_dir_copies_tree() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("sub")).unwrap();
        std::fs::write(src.join("top.txt"), "top").unwrap();
        std::fs::write(src.join("sub/inner.txt"), "inner").unwrap();

        let dest = temp.path().join("dest");
        fs.copy_dir(&src, &dest).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.join("top.txt")).unwrap(),
            "top"
        );
        assert_eq!(
            std::fs::read_to_string(dest.join("sub/inner.txt")).unwrap(),
            "inner"
        );
    }
}
