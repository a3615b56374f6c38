//! The handles a setup routine is given while it runs.

use std::path::Path;

use super::render::Renderer;
use crate::config::InterpolationContext;
use crate::error::Result;
use crate::fs::Filesystem;
use crate::ui::{Prompt, PromptResult, UserInterface};

/// Everything a setup routine may touch: prompting, rendering, removal,
/// and the locations it is working with.
pub struct Capabilities<'a> {
    ui: &'a mut dyn UserInterface,
    renderer: &'a Renderer,
    fs: &'a dyn Filesystem,
    where_input: &'a str,
    target: &'a Path,
    module_root: &'a Path,
}

impl<'a> Capabilities<'a> {
    pub fn new(
        ui: &'a mut dyn UserInterface,
        renderer: &'a Renderer,
        fs: &'a dyn Filesystem,
        where_input: &'a str,
        target: &'a Path,
        module_root: &'a Path,
    ) -> Self {
        Self {
            ui,
            renderer,
            fs,
            where_input,
            target,
            module_root,
        }
    }

    /// Ask the user a question.
    pub fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.ui.prompt(prompt)
    }

    /// Render a file or directory in place.
    pub fn render(&self, path: &Path, context: &InterpolationContext) -> Result<usize> {
        self.renderer.render(self.fs, path, context)
    }

    /// Recursively remove a file or directory. Missing paths are ignored.
    pub fn remove_all(&self, path: &Path) -> Result<()> {
        self.fs.remove_all(path)
    }

    pub fn ui(&mut self) -> &mut dyn UserInterface {
        &mut *self.ui
    }

    pub fn fs(&self) -> &'a dyn Filesystem {
        self.fs
    }

    /// The location exactly as the user typed it.
    pub fn where_input(&self) -> &'a str {
        self.where_input
    }

    /// The resolved project directory.
    pub fn target(&self) -> &'a Path {
        self.target
    }

    /// Directory the setup module was loaded from.
    pub fn module_root(&self) -> &'a Path {
        self.module_root
    }
}
