//! Registry package identifiers.

use std::fmt;

/// Version used when a package reference does not name one.
pub const LATEST: &str = "latest";

/// A registry package reference split into name and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Package name, including any `@scope/` prefix.
    pub name: String,
    /// Requested version, tag or range.
    pub version: String,
}

impl PackageSpec {
    /// Parse a `name@version` reference.
    ///
    /// A leading `@` marks a scope and is never treated as the version
    /// separator. A missing or empty version becomes [`LATEST`].
    pub fn parse(reference: &str) -> Self {
        let search_from = usize::from(reference.starts_with('@'));
        match reference[search_from..].rfind('@') {
            Some(pos) => {
                let split = search_from + pos;
                let version = &reference[split + 1..];
                Self {
                    name: reference[..split].to_string(),
                    version: if version.is_empty() {
                        LATEST.to_string()
                    } else {
                        version.to_string()
                    },
                }
            }
            None => Self {
                name: reference.to_string(),
                version: LATEST.to_string(),
            },
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
