//! Repository and SSH acquisition.

use std::path::{Path, PathBuf};

use crate::error::{Result, StarterError};
use crate::fs::Filesystem;
use crate::shell::{run_program, CommandOptions};
use crate::ui::UserInterface;

use super::{ENTRY_FILES, MANIFEST_FILE};

/// Directory inside a cloned template that holds its setup module.
pub const CONFIG_DIR: &str = ".starter";

/// Version-control client used to clone templates.
pub trait VersionControl {
    /// Clone `template` into `dest`, streaming output to the user.
    fn clone_repository(&self, template: &str, dest: &Path) -> Result<()>;
}

/// [`VersionControl`] backed by the `git` command.
#[derive(Debug, Clone)]
pub struct GitClient {
    program: PathBuf,
}

impl GitClient {
    /// Create a client running `program` (usually `git`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new("git")
    }
}

impl VersionControl for GitClient {
    fn clone_repository(&self, template: &str, dest: &Path) -> Result<()> {
        let dest_arg = dest.to_string_lossy();
        let args = ["clone", template, dest_arg.as_ref()];
        run_program(&self.program, &args, &CommandOptions::inherit())?
            .check(&format!("git clone {} {}", template, dest.display()))?;
        Ok(())
    }
}

/// Clone a repository or SSH template into `target`.
///
/// Returns the template's config directory when it carries a setup module,
/// `None` when the clone is the whole scaffold.
///
/// # Errors
///
/// Returns `CloneFailed` wrapping the client error. A partially created
/// target is left in place.
pub fn acquire_from_vcs(
    vcs: &dyn VersionControl,
    fs: &dyn Filesystem,
    ui: &mut dyn UserInterface,
    template: &str,
    target: &Path,
) -> Result<Option<PathBuf>> {
    ui.message("Cloning repository.");
    ui.rule();
    if let Err(e) = vcs.clone_repository(template, target) {
        ui.error("Error cloning repository.");
        return Err(StarterError::CloneFailed {
            template: template.to_string(),
            source: Box::new(e),
        });
    }
    ui.rule();

    Ok(find_config_dir(fs, target))
}

/// Locate `<root>/.starter` if it contains an entry file or a manifest.
pub fn find_config_dir(fs: &dyn Filesystem, root: &Path) -> Option<PathBuf> {
    let config_dir = root.join(CONFIG_DIR);
    let has_module = ENTRY_FILES
        .iter()
        .chain(std::iter::once(&MANIFEST_FILE))
        .any(|name| fs.exists(&config_dir.join(name)));

    if has_module {
        tracing::debug!("Found configuration in \"{}\".", config_dir.display());
        Some(config_dir)
    } else {
        tracing::debug!("No configuration found in \"{}\".", config_dir.display());
        None
    }
}
