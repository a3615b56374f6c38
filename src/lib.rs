//! Starters - scaffold new projects from templates.
//!
//! A template is a git repository, an SSH remote, or a package published to
//! a registry. Repositories are cloned straight into the target directory;
//! packages are installed into a shared cache. Either may carry a setup
//! configuration that prompts the user and finishes the project.
//!
//! # Modules
//!
//! - [`acquire`] - Cloning repositories and installing packages
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings and `${var}` interpolation
//! - [`error`] - Error types and result aliases
//! - [`fs`] - Filesystem access used by the pipeline
//! - [`pipeline`] - The `create` pipeline
//! - [`setup`] - Loading and running template configurations
//! - [`shell`] - External command execution
//! - [`target`] - Target directory resolution
//! - [`template`] - Template classification
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use starters::template::{classify, TemplateKind};
//!
//! assert_eq!(classify("https://github.com/org/repo.git"), TemplateKind::Repository);
//! assert_eq!(classify("git@github.com:org/repo.git"), TemplateKind::Ssh);
//! assert_eq!(classify("my-template@2.0.0"), TemplateKind::RegistryPackage);
//! ```

pub mod acquire;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod pipeline;
pub mod setup;
pub mod shell;
pub mod target;
pub mod template;
pub mod ui;

pub use error::{Result, StarterError};
pub use pipeline::{CreateOutcome, Starter};
