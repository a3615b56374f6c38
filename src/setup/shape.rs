//! Classifying what a loaded module evaluated to.

use std::fmt;

use super::loader::{LoadedModule, ModuleValue};
use super::routine::{DeclarativeRoutine, ScriptRoutine, SetupRoutine, SETUP_KEYS};
use crate::error::{Result, StarterError};

/// The shape of a loaded configuration.
pub enum ConfigShape {
    /// A routine to run against the project.
    Executable(Box<dyn SetupRoutine>),
    /// An old-style configuration naming a repository to restart from.
    LegacyRepository(String),
    /// Anything else; carries the kind of value found.
    Invalid(&'static str),
}

impl fmt::Debug for ConfigShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executable(routine) => {
                f.debug_tuple("Executable").field(&routine.name()).finish()
            }
            Self::LegacyRepository(repo) => {
                f.debug_tuple("LegacyRepository").field(repo).finish()
            }
            Self::Invalid(kind) => f.debug_tuple("Invalid").field(kind).finish(),
        }
    }
}

impl ConfigShape {
    /// Classify a loaded module.
    ///
    /// A mapping with any setup key is a declarative routine, even if it
    /// also names a `repository`. A malformed declarative routine is a load
    /// failure rather than an invalid shape.
    pub fn from_module(module: LoadedModule) -> Result<Self> {
        let value = match module.value {
            ModuleValue::Script(path) => {
                return Ok(Self::Executable(Box::new(ScriptRoutine::new(path))));
            }
            ModuleValue::Data(value) => value,
        };

        let serde_yaml::Value::Mapping(mapping) = &value else {
            return Ok(Self::Invalid(kind_of(&value)));
        };

        let has_setup_key = SETUP_KEYS.iter().any(|key| mapping.contains_key(*key));
        if has_setup_key {
            let routine: DeclarativeRoutine =
                serde_yaml::from_value(value.clone()).map_err(|e| load_failed(&module.path, e))?;
            routine.validate().map_err(|e| load_failed(&module.path, e))?;
            return Ok(Self::Executable(Box::new(routine)));
        }

        match mapping.get("repository") {
            Some(serde_yaml::Value::String(repo)) if !repo.trim().is_empty() => {
                Ok(Self::LegacyRepository(repo.trim().to_string()))
            }
            _ => Ok(Self::Invalid("object")),
        }
    }
}

fn load_failed(path: &std::path::Path, message: impl ToString) -> StarterError {
    StarterError::ConfigLoadFailed {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Name the kind of a data value the way error messages report it.
pub fn kind_of(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "array",
        serde_yaml::Value::Mapping(_) => "object",
        serde_yaml::Value::Tagged(_) => "tagged",
    }
}
