//! Cache command implementation.
//!
//! Provides `starters cache path` and `starters cache list`.

use clap::{Args, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// Print the cache directory.
    Path,
    /// List installed template packages.
    List,
}

/// A template package found in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPackage {
    pub name: String,
    pub version: Option<String>,
}

#[derive(Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

/// The cache command implementation.
pub struct CacheCommand {
    settings: Settings,
    args: CacheArgs,
}

impl CacheCommand {
    /// Create a new cache command.
    pub fn new(settings: Settings, args: CacheArgs) -> Self {
        Self { settings, args }
    }
}

impl Command for CacheCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let cache_dir = &self.settings.cache_dir;

        match &self.args.command {
            CacheSubcommand::Path => {
                println!("{}", cache_dir.display());
            }
            CacheSubcommand::List => {
                let packages = list_packages(cache_dir)?;
                if packages.is_empty() {
                    ui.message("Cache is empty");
                    return Ok(CommandResult::success());
                }

                ui.message(&format!("{} cached templates:\n", packages.len()));
                for package in packages {
                    match package.version {
                        Some(version) => ui.message(&format!("  {}@{}", package.name, version)),
                        None => ui.message(&format!("  {}", package.name)),
                    }
                }
            }
        }

        Ok(CommandResult::success())
    }
}

/// List packages under `<cache>/node_modules`, sorted by name.
pub fn list_packages(cache_dir: &Path) -> Result<Vec<CachedPackage>> {
    let modules = cache_dir.join("node_modules");
    if !modules.is_dir() {
        return Ok(Vec::new());
    }

    let mut packages = Vec::new();
    for (name, path) in package_dirs(&modules)? {
        if let Some(scope) = name.strip_prefix('@') {
            for (inner, inner_path) in package_dirs(&path)? {
                packages.push(read_package(format!("@{scope}/{inner}"), &inner_path));
            }
        } else {
            packages.push(read_package(name, &path));
        }
    }

    packages.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(packages)
}

fn package_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        dirs.push((name, entry.path()));
    }
    Ok(dirs)
}

fn read_package(name: String, dir: &Path) -> CachedPackage {
    let version = std::fs::read_to_string(dir.join("package.json"))
        .ok()
        .and_then(|content| serde_json::from_str::<PackageManifest>(&content).ok())
        .and_then(|manifest| manifest.version);
    CachedPackage { name, version }
}
