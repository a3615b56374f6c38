//! User settings.
//!
//! Settings come from, in increasing priority:
//! 1. Built-in defaults
//! 2. The settings file (`~/.config/starters/config.yml`, `STARTERS_CONFIG`
//!    or `--config`)
//! 3. Environment variables (`STARTERS_CACHE_DIR`)
//! 4. Command-line flags, applied by the caller

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, StarterError};
use crate::template::DEFAULT_LEGACY_HOST;

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "STARTERS_CACHE_DIR";

/// Environment variable pointing at an alternate settings file.
pub const CONFIG_ENV: &str = "STARTERS_CONFIG";

/// Default bound on legacy redirects per `create` call.
pub const DEFAULT_MAX_LEGACY_REDIRECTS: usize = 16;

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Shared install root for registry templates.
    pub cache_dir: PathBuf,
    /// Host used to rebuild references from legacy `repository` fields.
    pub legacy_host: String,
    /// How many legacy redirects one `create` call may follow.
    pub max_legacy_redirects: usize,
    /// Program used to clone repositories.
    pub git: PathBuf,
    /// Program used to install packages; looked up on PATH when unset.
    pub npm: Option<PathBuf>,
}

/// Settings file contents. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    cache_dir: Option<PathBuf>,
    legacy_host: Option<String>,
    max_legacy_redirects: Option<usize>,
    git: Option<PathBuf>,
    npm: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            legacy_host: DEFAULT_LEGACY_HOST.to_string(),
            max_legacy_redirects: DEFAULT_MAX_LEGACY_REDIRECTS,
            git: PathBuf::from("git"),
            npm: None,
        }
    }
}

/// `~/.starters`, or `.starters` under the working directory without a home.
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".starters")
}

/// `~/.config/starters/config.yml` (platform config dir).
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("starters").join("config.yml"))
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// `explicit` is a settings file named on the command line; it must
    /// exist. The default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k == CACHE_DIR_ENV || k == CONFIG_ENV)
            .collect();
        Self::load_with_env(explicit, &env)
    }

    /// Load settings with an explicit environment map.
    pub fn load_with_env(explicit: Option<&Path>, env: &HashMap<String, String>) -> Result<Self> {
        let mut settings = Self::default();

        let file_path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.get(CONFIG_ENV).map(PathBuf::from));

        match file_path {
            Some(path) => settings.apply_file(&path)?,
            None => {
                if let Some(path) = default_settings_path().filter(|p| p.is_file()) {
                    settings.apply_file(&path)?;
                }
            }
        }

        if let Some(dir) = env.get(CACHE_DIR_ENV).filter(|d| !d.is_empty()) {
            settings.cache_dir = PathBuf::from(dir);
        }

        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        tracing::debug!("Loading settings from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| StarterError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // An empty file deserializes as null.
        let file: SettingsFile = if content.trim().is_empty() {
            SettingsFile::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| StarterError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        if let Some(dir) = file.cache_dir {
            self.cache_dir = expand_home(&dir);
        }
        if let Some(host) = file.legacy_host {
            self.legacy_host = host;
        }
        if let Some(max) = file.max_legacy_redirects {
            self.max_legacy_redirects = max;
        }
        if let Some(git) = file.git {
            self.git = git;
        }
        if file.npm.is_some() {
            self.npm = file.npm;
        }

        Ok(())
    }

    /// Override the cache directory (from `--cache-dir`).
    pub fn with_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.cache_dir = dir;
        }
        self
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
