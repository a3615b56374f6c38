//! Loading configuration entry points.
//!
//! A path resolves to a module the way a package directory does: an
//! explicit file is loaded as-is; a directory is resolved through the
//! `main` field of its `package.json`, then through the first existing
//! `index.*` entry file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::acquire::{ENTRY_FILES, MANIFEST_FILE};
use crate::error::{Result, StarterError};

/// The raw value a module evaluates to.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleValue {
    /// An executable setup script.
    Script(PathBuf),
    /// A data document (YAML or JSON).
    Data(serde_yaml::Value),
}

/// A loaded configuration module.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    /// Directory the module's own files are resolved against.
    pub root: PathBuf,
    /// The entry file that was loaded.
    pub path: PathBuf,
    /// What the entry file evaluated to.
    pub value: ModuleValue,
}

/// Resolves a filesystem path to a loaded module.
pub trait ModuleLoader {
    /// Load the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ModuleNotFound` when nothing loadable exists at `path`, and
    /// `ConfigParseError` when the entry file or manifest is malformed.
    fn load(&self, path: &Path) -> Result<LoadedModule>;
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    main: Option<String>,
}

/// [`ModuleLoader`] for on-disk YAML/JSON setup files and scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }

    /// Find the entry file for `path` without loading it.
    pub fn resolve_entry(&self, path: &Path) -> Result<PathBuf> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        if !path.is_dir() {
            return Err(StarterError::ModuleNotFound {
                path: path.to_path_buf(),
            });
        }

        let manifest_path = path.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            if let Some(main) = read_manifest(&manifest_path)?.main {
                let candidate = path.join(&main);
                if candidate.is_file() {
                    return Ok(candidate);
                }
                if candidate.is_dir() {
                    return find_index(&candidate);
                }
                return Err(StarterError::ModuleNotFound { path: candidate });
            }
        }

        find_index(path)
    }
}

fn find_index(dir: &Path) -> Result<PathBuf> {
    ENTRY_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| StarterError::ModuleNotFound {
            path: dir.to_path_buf(),
        })
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StarterError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_error(path: &Path, message: impl ToString) -> StarterError {
    StarterError::ConfigParseError {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

impl ModuleLoader for ManifestLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule> {
        let entry = self.resolve_entry(path)?;
        let root = if path.is_dir() {
            path.to_path_buf()
        } else {
            entry
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let extension = entry
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let value = match extension.as_deref() {
            Some("yml") | Some("yaml") => {
                let content = std::fs::read_to_string(&entry)?;
                if content.trim().is_empty() {
                    ModuleValue::Data(serde_yaml::Value::Null)
                } else {
                    ModuleValue::Data(
                        serde_yaml::from_str(&content).map_err(|e| parse_error(&entry, e))?,
                    )
                }
            }
            Some("json") => {
                let content = std::fs::read_to_string(&entry)?;
                let json: serde_json::Value =
                    serde_json::from_str(&content).map_err(|e| parse_error(&entry, e))?;
                ModuleValue::Data(serde_yaml::to_value(json).map_err(|e| parse_error(&entry, e))?)
            }
            _ => ModuleValue::Script(entry.clone()),
        };

        tracing::debug!("Loaded module {}", entry.display());

        Ok(LoadedModule {
            root,
            path: entry,
            value,
        })
    }
}
