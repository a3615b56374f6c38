//! Setup routines: what a loaded configuration runs.
//!
//! A routine is either declarative (a YAML/JSON document listing prompts,
//! files to copy, paths to render or remove and commands to run) or a
//! script executed with the project's environment. Library users can also
//! pass any closure taking [`Capabilities`].

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use super::capabilities::Capabilities;
use crate::config::{resolve_string, InterpolationContext};
use crate::error::{Result, StarterError};
use crate::shell::{execute, run_program, CommandOptions};
use crate::ui::{Prompt, PromptOption, PromptType};

/// Environment variable carrying the where-input to scripts.
pub const WHERE_ENV: &str = "STARTERS_WHERE";
/// Environment variable carrying the resolved target to scripts.
pub const TARGET_ENV: &str = "STARTERS_TARGET";
/// Environment variable carrying the module root to scripts.
pub const TEMPLATE_ROOT_ENV: &str = "STARTERS_TEMPLATE_ROOT";

/// Something a configuration can run against a project.
pub trait SetupRoutine {
    /// Short name for logging.
    fn name(&self) -> &'static str {
        "routine"
    }

    /// Run the routine.
    fn run(&self, caps: &mut Capabilities<'_>) -> Result<()>;
}

impl<F> SetupRoutine for F
where
    F: Fn(&mut Capabilities<'_>) -> Result<()>,
{
    fn name(&self) -> &'static str {
        "function"
    }

    fn run(&self, caps: &mut Capabilities<'_>) -> Result<()> {
        self(caps)
    }
}

/// Kind of prompt in a declarative setup file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    #[default]
    Input,
    Confirm,
    Select,
    Multiselect,
}

/// A prompt entry in a declarative setup file.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptSpec {
    pub key: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: PromptKind,
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
    #[serde(default)]
    pub options: Vec<PromptOption>,
}

impl PromptSpec {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("prompt key must not be empty".to_string());
        }
        let needs_options = matches!(self.kind, PromptKind::Select | PromptKind::Multiselect);
        if needs_options && self.options.is_empty() {
            return Err(format!("prompt '{}' has no options", self.key));
        }
        Ok(())
    }

    fn default_text(&self) -> Option<String> {
        match self.default.as_ref()? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Sequence(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }

    fn to_prompt(&self, context: &InterpolationContext) -> Result<Prompt> {
        let prompt_type = match self.kind {
            PromptKind::Input => PromptType::Input,
            PromptKind::Confirm => PromptType::Confirm,
            PromptKind::Select => PromptType::Select {
                options: self.options.clone(),
            },
            PromptKind::Multiselect => PromptType::MultiSelect {
                options: self.options.clone(),
            },
        };

        let default = self
            .default_text()
            .map(|d| resolve_string(&d, context))
            .transpose()?;

        Ok(Prompt {
            key: self.key.clone(),
            question: self.question.clone().unwrap_or_else(|| self.key.clone()),
            prompt_type,
            default,
        })
    }
}

/// A setup routine described by data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeRoutine {
    #[serde(default)]
    pub prompts: Vec<PromptSpec>,
    /// Directory under the module root copied into the target.
    #[serde(default)]
    pub files: Option<String>,
    #[serde(default)]
    pub render: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
    #[serde(default)]
    pub run: Vec<String>,
}

/// Keys that make a mapping a declarative routine.
pub const SETUP_KEYS: &[&str] = &["prompts", "files", "render", "remove", "run"];

impl DeclarativeRoutine {
    /// Check the routine for structural problems before running it.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for prompt in &self.prompts {
            prompt.validate()?;
        }
        let paths = self
            .files
            .iter()
            .chain(&self.render)
            .chain(&self.remove);
        for path in paths {
            if !is_contained(path) {
                return Err(format!("path '{path}' must be relative to the project"));
            }
        }
        Ok(())
    }
}

fn is_contained(relative: &str) -> bool {
    let path = Path::new(relative);
    !relative.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Join `relative` onto `base`, rejecting absolute or escaping paths.
pub fn contained_path(base: &Path, relative: &str) -> Result<PathBuf> {
    if !is_contained(relative) {
        return Err(StarterError::UnsafePath {
            path: relative.to_string(),
        });
    }
    Ok(base.join(relative))
}

impl SetupRoutine for DeclarativeRoutine {
    fn name(&self) -> &'static str {
        "declarative"
    }

    fn run(&self, caps: &mut Capabilities<'_>) -> Result<()> {
        let target = caps.target();
        let fs = caps.fs();
        let mut context = InterpolationContext::new().with_project(target, caps.where_input());

        for spec in &self.prompts {
            let prompt = spec.to_prompt(&context)?;
            let answer = caps.prompt(&prompt)?;
            context.answers.insert(spec.key.clone(), answer.as_string());
        }

        fs.create_dir_all(target)?;

        if let Some(files) = &self.files {
            let source = contained_path(caps.module_root(), files)?;
            tracing::debug!("Copying {} into {}", source.display(), target.display());
            fs.copy_dir(&source, target)?;
        }

        for relative in &self.render {
            let path = contained_path(target, relative)?;
            caps.render(&path, &context)?;
        }

        for relative in &self.remove {
            let path = contained_path(target, relative)?;
            caps.remove_all(&path)?;
        }

        for command in &self.run {
            let command = resolve_string(command, &context)?;
            caps.ui().message(&format!("$ {command}"));
            execute(&command, &CommandOptions::inherit().in_dir(target))?.check(&command)?;
        }

        Ok(())
    }
}

/// A setup script run with the project's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRoutine {
    pub path: PathBuf,
}

impl ScriptRoutine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SetupRoutine for ScriptRoutine {
    fn name(&self) -> &'static str {
        "script"
    }

    fn run(&self, caps: &mut Capabilities<'_>) -> Result<()> {
        let target = caps.target();
        caps.fs().create_dir_all(target)?;

        let options = CommandOptions::inherit()
            .in_dir(target)
            .with_env(WHERE_ENV, caps.where_input())
            .with_env(TARGET_ENV, target.display().to_string())
            .with_env(TEMPLATE_ROOT_ENV, caps.module_root().display().to_string());

        let display = self.path.display().to_string();
        let is_shell = self.path.extension().is_some_and(|ext| ext == "sh");
        let result = if is_shell {
            run_program(Path::new("sh"), &[&self.path], &options)?
        } else {
            run_program(&self.path, &[] as &[&str], &options)?
        };
        result.check(&display)?;
        Ok(())
    }
}
