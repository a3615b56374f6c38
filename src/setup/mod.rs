//! Loading and running a template's configuration.
//!
//! - [`loader`] - resolves an entry point to a [`LoadedModule`]
//! - [`shape`] - decides whether the module is runnable, legacy or invalid
//! - [`routine`] - declarative and script setup routines
//! - [`capabilities`] - the handles a routine runs with
//! - [`render`] - in-place `${var}` rendering

pub mod capabilities;
pub mod loader;
pub mod render;
pub mod routine;
pub mod shape;

pub use capabilities::Capabilities;
pub use loader::{LoadedModule, ManifestLoader, ModuleLoader, ModuleValue};
pub use render::Renderer;
pub use routine::{
    contained_path, DeclarativeRoutine, PromptKind, PromptSpec, ScriptRoutine, SetupRoutine,
    SETUP_KEYS, TARGET_ENV, TEMPLATE_ROOT_ENV, WHERE_ENV,
};
pub use shape::{kind_of, ConfigShape};

use std::path::Path;

use crate::error::{Result, StarterError};
use crate::fs::Filesystem;
use crate::ui::UserInterface;

/// What running a configuration asks the pipeline to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    /// The routine ran to completion.
    Completed,
    /// A legacy configuration named the repository to restart from.
    Redirect(String),
}

/// Project locations and collaborators a configuration runs against.
pub struct RunContext<'a> {
    pub fs: &'a dyn Filesystem,
    pub renderer: &'a Renderer,
    pub where_input: &'a str,
    pub target: &'a Path,
}

/// Load the configuration at `entry_point` and act on its shape.
pub fn run_config(
    loader: &dyn ModuleLoader,
    entry_point: &Path,
    ui: &mut dyn UserInterface,
    ctx: &RunContext<'_>,
) -> Result<ConfigOutcome> {
    let module = match loader.load(entry_point) {
        Ok(module) => module,
        Err(e) => {
            import_failed(ui, entry_point);
            return Err(match e {
                e @ StarterError::ConfigLoadFailed { .. } => e,
                other => StarterError::ConfigLoadFailed {
                    path: entry_point.to_path_buf(),
                    message: other.to_string(),
                },
            });
        }
    };

    let path = module.path.clone();
    let root = module.root.clone();
    let shape =
        ConfigShape::from_module(module).inspect_err(|_| import_failed(ui, entry_point))?;
    tracing::debug!("Configuration {} has shape {:?}", path.display(), shape);

    match shape {
        ConfigShape::Executable(routine) => {
            ui.message("Running configuration script.");
            let result = {
                let mut caps = Capabilities::new(
                    ui,
                    ctx.renderer,
                    ctx.fs,
                    ctx.where_input,
                    ctx.target,
                    &root,
                );
                routine.run(&mut caps)
            };
            if let Err(e) = result {
                ui.error(&format!("Could not run configuration \"{}\".", path.display()));
                return Err(StarterError::ConfigExecutionFailed {
                    path,
                    source: Box::new(e),
                });
            }
            ui.success("Configuration complete.");
            Ok(ConfigOutcome::Completed)
        }
        ConfigShape::LegacyRepository(repo) => {
            tracing::warn!(
                "Legacy configuration at {} redirects to {}",
                path.display(),
                repo
            );
            ui.warning("This package is using a legacy format.");
            Ok(ConfigOutcome::Redirect(repo))
        }
        ConfigShape::Invalid(kind) => {
            ui.error(&format!("Could not run configuration \"{}\".", path.display()));
            Err(StarterError::InvalidConfigShape {
                kind: kind.to_string(),
            })
        }
    }
}

fn import_failed(ui: &mut dyn UserInterface, entry_point: &Path) {
    ui.error(&format!(
        "Could not import configuration from \"{}\".",
        entry_point.display()
    ));
}
