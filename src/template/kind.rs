//! Template classification.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Host used to rebuild references from legacy `repository` fields.
pub const DEFAULT_LEGACY_HOST: &str = "github.com";

// A protocol (or protocol-relative `//`) followed by a dotted host or localhost.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\w+:)?//([^\s.]+\.\S{2}|localhost[:?\d]*)\S*$").unwrap()
});

static SSH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.~-]+@[\w.-]+:\S+$").unwrap());

/// How a template reference is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// A well-formed network URL, cloned with git.
    Repository,
    /// An SCP-style SSH remote, cloned with git.
    Ssh,
    /// A registry package identifier, installed into the cache.
    RegistryPackage,
}

impl TemplateKind {
    /// Whether this kind is acquired with the version-control client.
    pub fn is_vcs(&self) -> bool {
        matches!(self, Self::Repository | Self::Ssh)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository => write!(f, "repository"),
            Self::Ssh => write!(f, "ssh"),
            Self::RegistryPackage => write!(f, "package"),
        }
    }
}

/// Check whether a string is a network URL.
pub fn is_url(input: &str) -> bool {
    URL_REGEX.is_match(input)
}

/// Check whether a string is an SCP-style SSH remote (`user@host:path`).
pub fn is_ssh(input: &str) -> bool {
    SSH_REGEX.is_match(input)
}

/// Classify a template reference.
///
/// Total over all inputs: anything that is neither a URL nor an SSH remote
/// is treated as a registry package and validated later by the installer.
pub fn classify(template: &str) -> TemplateKind {
    if is_url(template) {
        TemplateKind::Repository
    } else if is_ssh(template) {
        TemplateKind::Ssh
    } else {
        TemplateKind::RegistryPackage
    }
}

/// Build the SSH reference a legacy `repository` field points at.
pub fn legacy_reference(host: &str, repository: &str) -> String {
    format!("git@{}:{}", host, repository)
}
