//! Error types for starters operations.
//!
//! This module defines [`StarterError`], the error type used throughout the
//! pipeline, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Each pipeline stage wraps the collaborator failure in a stage-specific
//!   variant and keeps the underlying error as its `source`
//! - Use `anyhow::Error` (via `StarterError::Other`) for unexpected errors
//! - Every error is terminal; nothing is retried

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for starters operations.
#[derive(Debug, Error)]
pub enum StarterError {
    /// The target exists and has content.
    #[error("Directory is not empty: {path}")]
    DirectoryNotEmpty { path: PathBuf },

    /// The target exists but is not a directory.
    #[error("Target exists and is not a directory: {path}")]
    InvalidTarget { path: PathBuf },

    /// Cloning a repository or SSH remote failed.
    #[error("Failed to clone {template}")]
    CloneFailed {
        template: String,
        #[source]
        source: Box<StarterError>,
    },

    /// Installing a registry package into the cache failed.
    #[error("Failed to install package \"{package}\"")]
    InstallFailed {
        package: String,
        #[source]
        source: Box<StarterError>,
    },

    /// The configuration entry point could not be loaded.
    #[error("Could not import configuration from \"{path}\": {message}")]
    ConfigLoadFailed { path: PathBuf, message: String },

    /// No loadable module exists at the given location.
    #[error("Module not found: {path}")]
    ModuleNotFound { path: PathBuf },

    /// The setup routine ran and failed.
    #[error("Configuration at \"{path}\" failed")]
    ConfigExecutionFailed {
        path: PathBuf,
        #[source]
        source: Box<StarterError>,
    },

    /// The loaded configuration is neither a setup routine nor a legacy object.
    #[error("Expected a setup routine but got \"{kind}\"")]
    InvalidConfigShape { kind: String },

    /// Legacy configurations kept redirecting past the configured bound.
    #[error("Legacy template redirected more than {limit} times")]
    LegacyRedirectLimit { limit: usize },

    /// An external command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// An external command failed and reported why on stderr.
    #[error("Command failed with exit code {code:?}: {command}\n{stderr}")]
    CommandFailedWithOutput {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An external command could not be started.
    #[error("Failed to start {command}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A required external tool is not on PATH.
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolNotFound { tool: String },

    /// A settings or setup file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A `${name}` reference had no value.
    #[error("Unresolved variable: ${{{name}}}")]
    UnresolvedVariable { name: String },

    /// A setup routine referenced a path outside the project.
    #[error("Path escapes the project directory: {path}")]
    UnsafePath { path: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for starters operations.
pub type Result<T> = std::result::Result<T, StarterError>;
