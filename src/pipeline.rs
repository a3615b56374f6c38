//! The `create` pipeline.
//!
//! ```text
//! ResolveTarget -> Classify -> Acquire -> has config? -> Load -> Executable -> done
//!                                                            -> Legacy     -> restart
//!                                                            -> Invalid    -> fail
//! ```
//!
//! A legacy configuration restarts the pipeline with a rebuilt repository
//! reference. Restarts run as a loop bounded by
//! [`Settings::max_legacy_redirects`].
//!
//! Concurrent runs that share a cache directory are not coordinated; two
//! installs into the same cache at once may interfere.

use std::path::{Path, PathBuf};

use crate::acquire::{
    acquire_from_registry, acquire_from_vcs, GitClient, NpmClient, PackageManager, VersionControl,
};
use crate::config::Settings;
use crate::error::{Result, StarterError};
use crate::fs::{Filesystem, LocalFilesystem};
use crate::setup::{run_config, ConfigOutcome, ManifestLoader, ModuleLoader, Renderer, RunContext};
use crate::target;
use crate::template::{classify, legacy_reference};
use crate::ui::UserInterface;

/// Inputs of one pass through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    pub where_input: String,
    pub template: String,
    pub cache_dir: PathBuf,
}

/// Result of a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The project directory.
    pub target: PathBuf,
    /// Whether a setup routine ran.
    pub configured: bool,
    /// Number of legacy redirects followed.
    pub redirects: usize,
    /// Every template reference dispatched, in order.
    pub templates: Vec<String>,
}

/// Scaffolds projects from templates.
pub struct Starter {
    vcs: Box<dyn VersionControl>,
    packages: Box<dyn PackageManager>,
    loader: Box<dyn ModuleLoader>,
    fs: Box<dyn Filesystem>,
    renderer: Renderer,
    cache_dir: PathBuf,
    legacy_host: String,
    max_legacy_redirects: usize,
    cwd: PathBuf,
}

impl Starter {
    /// Create a starter using git, npm and the local filesystem.
    pub fn new(settings: &Settings, cwd: impl Into<PathBuf>) -> Self {
        let packages = match &settings.npm {
            Some(program) => NpmClient::with_program(program),
            None => NpmClient::new(),
        };

        Self {
            vcs: Box::new(GitClient::new(&settings.git)),
            packages: Box::new(packages),
            loader: Box::new(ManifestLoader::new()),
            fs: Box::new(LocalFilesystem::new()),
            renderer: Renderer::new(),
            cache_dir: settings.cache_dir.clone(),
            legacy_host: settings.legacy_host.clone(),
            max_legacy_redirects: settings.max_legacy_redirects,
            cwd: cwd.into(),
        }
    }

    pub fn with_vcs(mut self, vcs: impl VersionControl + 'static) -> Self {
        self.vcs = Box::new(vcs);
        self
    }

    pub fn with_package_manager(mut self, packages: impl PackageManager + 'static) -> Self {
        self.packages = Box::new(packages);
        self
    }

    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_filesystem(mut self, fs: impl Filesystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    /// Default cache directory used when `create` is not given one.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Scaffold `template` into `where_input`.
    ///
    /// `cache_dir` overrides the configured cache for registry templates.
    ///
    /// # Errors
    ///
    /// Fails with `DirectoryNotEmpty` or `InvalidTarget` before anything is
    /// acquired, and with the stage-specific variant when acquisition or
    /// configuration fails. Nothing is retried or rolled back.
    pub fn create(
        &self,
        where_input: &str,
        template: &str,
        cache_dir: Option<&Path>,
        ui: &mut dyn UserInterface,
    ) -> Result<CreateOutcome> {
        let mut state = PipelineState {
            where_input: where_input.to_string(),
            template: template.to_string(),
            cache_dir: cache_dir.unwrap_or(&self.cache_dir).to_path_buf(),
        };
        let mut templates = Vec::new();

        loop {
            templates.push(state.template.clone());
            let target = target::resolve(&state.where_input, &self.cwd);

            if let Err(e) = target::ensure_clearable(&target, self.fs.as_ref()) {
                ui.error(&e.to_string());
                return Err(e);
            }

            let kind = classify(&state.template);
            tracing::debug!("Template {} classified as {}", state.template, kind);

            let entry_point = if kind.is_vcs() {
                acquire_from_vcs(
                    self.vcs.as_ref(),
                    self.fs.as_ref(),
                    ui,
                    &state.template,
                    &target,
                )?
            } else {
                Some(acquire_from_registry(
                    self.packages.as_ref(),
                    self.fs.as_ref(),
                    ui,
                    &state.template,
                    &state.cache_dir,
                )?)
            };

            let Some(entry_point) = entry_point else {
                return Ok(self.finish(ui, target, false, templates));
            };

            let ctx = RunContext {
                fs: self.fs.as_ref(),
                renderer: &self.renderer,
                where_input: &state.where_input,
                target: &target,
            };
            match run_config(self.loader.as_ref(), &entry_point, ui, &ctx)? {
                ConfigOutcome::Completed => {
                    return Ok(self.finish(ui, target, true, templates));
                }
                ConfigOutcome::Redirect(repo) => {
                    if templates.len() > self.max_legacy_redirects {
                        let err = StarterError::LegacyRedirectLimit {
                            limit: self.max_legacy_redirects,
                        };
                        ui.error(&err.to_string());
                        return Err(err);
                    }
                    state = PipelineState {
                        where_input: target.display().to_string(),
                        template: legacy_reference(&self.legacy_host, &repo),
                        cache_dir: state.cache_dir,
                    };
                    tracing::debug!("Restarting pipeline with {:?}", state);
                }
            }
        }
    }

    fn finish(
        &self,
        ui: &mut dyn UserInterface,
        target: PathBuf,
        configured: bool,
        templates: Vec<String>,
    ) -> CreateOutcome {
        ui.message("Access your new project by running the following:");
        ui.shell_hint("cd", &target::display_relative(&target, &self.cwd));

        CreateOutcome {
            target,
            configured,
            redirects: templates.len() - 1,
            templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    struct NoVcs;

    impl VersionControl for NoVcs {
        fn clone_repository(&self, _template: &str, dest: &Path) -> Result<()> {
            std::fs::create_dir_all(dest)?;
            Ok(())
        }
    }

    struct NoPackages;

    impl PackageManager for NoPackages {
        fn install(&self, spec: &str, _options: &crate::acquire::InstallOptions) -> Result<()> {
            Err(StarterError::CommandFailed {
                command: format!("npm install {spec}"),
                code: Some(1),
            })
        }
    }

    fn starter(cwd: &Path) -> Starter {
        Starter::new(&Settings::default(), cwd)
            .with_vcs(NoVcs)
            .with_package_manager(NoPackages)
    }

    #[test]
    fn clone_without_config_finishes_unconfigured() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let outcome = starter(temp.path())
            .create("app", "https://example.com/org/repo.git", None, &mut ui)
            .unwrap();

        assert_eq!(outcome.target, temp.path().join("app"));
        assert!(!outcome.configured);
        assert_eq!(outcome.redirects, 0);
        assert!(ui.has_message("  $ cd app"));
    }

    #[test]
    fn registry_failure_uses_explicit_cache() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        let mut ui = MockUI::new();

        let err = starter(temp.path())
            .create("app", "my-template", Some(&cache), &mut ui)
            .unwrap_err();

        assert!(matches!(err, StarterError::InstallFailed { .. }));
        assert!(cache.is_dir());
        assert!(!ui.has_message("Access your new project"));
    }

    #[test]
    fn file_in_the_way_is_invalid_target() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("app"), "not a dir").unwrap();
        let mut ui = MockUI::new();

        let err = starter(temp.path())
            .create("app", "git@example.com:org/repo.git", None, &mut ui)
            .unwrap_err();

        assert!(matches!(err, StarterError::InvalidTarget { .. }));
    }
}
