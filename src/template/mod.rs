//! Template references.
//!
//! A template reference is the string a user passes to `starters create`.
//! It is classified, never rewritten, into one of three kinds:
//!
//! - [`TemplateKind::Repository`] - a network URL handed to git
//! - [`TemplateKind::Ssh`] - a `user@host:path` remote handed to git
//! - [`TemplateKind::RegistryPackage`] - anything else, installed with npm
//!
//! # Example
//!
//! ```
//! use starters::template::{classify, PackageSpec, TemplateKind};
//!
//! assert_eq!(classify("https://example.com/org/repo.git"), TemplateKind::Repository);
//! assert_eq!(classify("git@example.com:org/repo.git"), TemplateKind::Ssh);
//! assert_eq!(classify("my-template@2.0.0"), TemplateKind::RegistryPackage);
//!
//! let spec = PackageSpec::parse("my-template@2.0.0");
//! assert_eq!(spec.name, "my-template");
//! assert_eq!(spec.version, "2.0.0");
//! ```

pub mod kind;
pub mod package;

pub use kind::{classify, is_ssh, is_url, legacy_reference, TemplateKind, DEFAULT_LEGACY_HOST};
pub use package::{PackageSpec, LATEST};
