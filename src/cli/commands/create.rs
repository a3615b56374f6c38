//! The `starters create` command.

use std::path::{Path, PathBuf};

use crate::cli::args::CreateArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::Starter;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The create command implementation.
pub struct CreateCommand {
    cwd: PathBuf,
    settings: Settings,
    args: CreateArgs,
}

impl CreateCommand {
    /// Create a new create command.
    pub fn new(cwd: &Path, settings: Settings, args: CreateArgs) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            settings,
            args,
        }
    }

    fn starter(&self) -> Starter {
        let settings = self
            .settings
            .clone()
            .with_cache_dir(self.args.cache_dir.clone());
        Starter::new(&settings, &self.cwd)
    }
}

impl Command for CreateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let outcome = self
            .starter()
            .create(&self.args.where_input, &self.args.template, None, ui)?;

        tracing::debug!(
            "Created {} (configured: {}, redirects: {})",
            outcome.target.display(),
            outcome.configured,
            outcome.redirects
        );
        Ok(CommandResult::success())
    }
}
