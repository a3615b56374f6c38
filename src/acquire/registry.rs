//! Registry package acquisition.
//!
//! Every registry template is installed into one shared cache directory
//! that is created on first use and never cleaned. Two concurrent runs
//! installing into the same cache are not coordinated.

use std::path::{Path, PathBuf};

use crate::error::{Result, StarterError};
use crate::fs::Filesystem;
use crate::shell::{run_program, CommandOptions};
use crate::template::PackageSpec;
use crate::ui::UserInterface;

/// Options for an ephemeral install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Install root (`--prefix`).
    pub prefix: PathBuf,
    /// Working directory of the package manager.
    pub cwd: PathBuf,
    /// Do not record the package as a dependency.
    pub no_save: bool,
}

impl InstallOptions {
    /// Side install into `cache_dir`, run from inside it.
    pub fn ephemeral(cache_dir: &Path) -> Self {
        Self {
            prefix: cache_dir.to_path_buf(),
            cwd: cache_dir.to_path_buf(),
            no_save: true,
        }
    }
}

/// Package-manager client used to install registry templates.
pub trait PackageManager {
    /// Install `spec` (the raw template reference) according to `options`.
    fn install(&self, spec: &str, options: &InstallOptions) -> Result<()>;
}

/// [`PackageManager`] backed by the `npm` command.
#[derive(Debug, Clone, Default)]
pub struct NpmClient {
    program: Option<PathBuf>,
}

impl NpmClient {
    /// Create a client that looks `npm` up on PATH at install time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client running a specific npm binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn program(&self) -> Result<PathBuf> {
        match &self.program {
            Some(program) => Ok(program.clone()),
            None => which::which("npm").map_err(|_| StarterError::ToolNotFound {
                tool: "npm".to_string(),
            }),
        }
    }

    /// Arguments passed to npm for `spec`.
    pub fn install_args(spec: &str, options: &InstallOptions) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        if options.no_save {
            args.push("--no-save".to_string());
        }
        args.push("--prefix".to_string());
        args.push(options.prefix.display().to_string());
        args.push(spec.to_string());
        args
    }
}

impl PackageManager for NpmClient {
    fn install(&self, spec: &str, options: &InstallOptions) -> Result<()> {
        let program = self.program()?;
        let args = Self::install_args(spec, options);
        run_program(
            &program,
            &args,
            &CommandOptions::captured().in_dir(&options.cwd),
        )?
        .check(&format!("npm {}", args.join(" ")))?;
        Ok(())
    }
}

/// Where an installed package lives inside the cache.
pub fn cache_module_path(cache_dir: &Path, name: &str) -> PathBuf {
    let mut path = cache_dir.join("node_modules");
    // Scoped names carry a `/` and map onto nested directories.
    for part in name.split('/') {
        path.push(part);
    }
    path
}

/// Install a registry template into `cache_dir` and return its module path.
///
/// # Errors
///
/// Returns `InstallFailed` wrapping the client error. The cache is left
/// in whatever state the package manager produced.
pub fn acquire_from_registry(
    packages: &dyn PackageManager,
    fs: &dyn Filesystem,
    ui: &mut dyn UserInterface,
    template: &str,
    cache_dir: &Path,
) -> Result<PathBuf> {
    let spec = PackageSpec::parse(template);
    tracing::debug!("Resolved package {} in cache {}", spec, cache_dir.display());

    ui.message("Installing package.");

    if !fs.exists(cache_dir) {
        fs.create_dir_all(cache_dir)?;
    }

    let mut spinner = ui.start_spinner(&format!("Installing {}", template));
    if let Err(e) = packages.install(template, &InstallOptions::ephemeral(cache_dir)) {
        spinner.finish_error(&format!("Install of {} failed", template));
        ui.error(&format!("Could not install package \"{}\".", template));
        return Err(StarterError::InstallFailed {
            package: template.to_string(),
            source: Box::new(e),
        });
    }
    spinner.finish_success(&format!("Installed {}", spec));

    Ok(cache_module_path(cache_dir, &spec.name))
}
