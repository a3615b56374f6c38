//! In-place `${var}` rendering of project files.

use std::path::Path;
use walkdir::WalkDir;

use crate::config::{resolve_string, InterpolationContext};
use crate::error::{Result, StarterError};
use crate::fs::Filesystem;

/// Rewrites files under a path, substituting interpolation variables.
///
/// Files that are not valid UTF-8 are left untouched, as are `.git`
/// directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render `path` (a file, or every file under a directory) in place.
    ///
    /// Returns the number of files that changed.
    pub fn render(
        &self,
        fs: &dyn Filesystem,
        path: &Path,
        context: &InterpolationContext,
    ) -> Result<usize> {
        if !fs.is_dir(path) {
            return Ok(usize::from(self.render_file(fs, path, context)?));
        }

        let mut rendered = 0;
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
        {
            let entry = entry.map_err(|e| anyhow::anyhow!(e))?;
            if entry.file_type().is_file() && self.render_file(fs, entry.path(), context)? {
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    fn render_file(
        &self,
        fs: &dyn Filesystem,
        path: &Path,
        context: &InterpolationContext,
    ) -> Result<bool> {
        let bytes = fs.read(path)?;
        let Ok(text) = String::from_utf8(bytes) else {
            tracing::debug!("Skipping binary file {}", path.display());
            return Ok(false);
        };

        if !text.contains("${") {
            return Ok(false);
        }

        let output = resolve_string(&text, context).map_err(|e| {
            StarterError::Other(
                anyhow::Error::new(e).context(format!("Failed to render {}", path.display())),
            )
        })?;

        if output == text {
            return Ok(false);
        }

        fs.write(path, output.as_bytes())?;
        tracing::debug!("Rendered {}", path.display());
        Ok(true)
    }
}
