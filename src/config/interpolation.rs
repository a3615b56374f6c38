//! Variable interpolation for rendered files and setup commands.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! An unterminated `${` is kept as literal text.
//!
//! # Example
//!
//! ```
//! use starters::config::{resolve_string, InterpolationContext};
//!
//! let mut ctx = InterpolationContext::new();
//! ctx.answers.insert("name".to_string(), "web".to_string());
//! assert_eq!(resolve_string("# ${name}", &ctx).unwrap(), "# web");
//! ```

use crate::error::{Result, StarterError};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing `${var}` interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(escaped) = after.strip_prefix("${") {
            // $${...} -> literal ${...}
            literal.push_str("${");
            rest = escaped;
        } else if let Some(body) = after.strip_prefix('{') {
            match body.find('}') {
                Some(end) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(body[..end].trim().to_string()));
                    rest = &body[end + 1..];
                }
                None => {
                    literal.push_str("${");
                    rest = body;
                }
            }
        } else {
            literal.push('$');
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

/// Extract all variable names from an interpolated string, sorted.
pub fn extract_variables(input: &str) -> BTreeSet<String> {
    parse_interpolation(input)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Variable(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Check if a string contains any interpolation.
pub fn has_interpolation(input: &str) -> bool {
    parse_interpolation(input)
        .iter()
        .any(|seg| matches!(seg, Segment::Variable(_)))
}

/// Context for variable resolution.
///
/// Prompt answers take priority over built-in variables.
#[derive(Debug, Default, Clone)]
pub struct InterpolationContext {
    /// Answers collected from setup prompts.
    pub answers: HashMap<String, String>,

    /// Built-in variables (project_name, project_root, where, starters_version)
    pub builtins: HashMap<String, String>,
}

impl InterpolationContext {
    /// Create a new context with built-in variables.
    pub fn new() -> Self {
        let mut builtins = HashMap::new();
        builtins.insert(
            "starters_version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );

        Self {
            builtins,
            ..Default::default()
        }
    }

    /// Add project information to builtins.
    pub fn with_project(mut self, root: &Path, where_input: &str) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.builtins.insert("project_name".to_string(), name);
        self.builtins
            .insert("project_root".to_string(), root.display().to_string());
        self.builtins
            .insert("where".to_string(), where_input.to_string());
        self
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.answers
            .get(name)
            .or_else(|| self.builtins.get(name))
            .map(String::as_str)
    }
}

/// Resolve all variables in an interpolated string.
///
/// # Errors
///
/// Returns `UnresolvedVariable` if any variable is not found in the context.
pub fn resolve_string(input: &str, context: &InterpolationContext) -> Result<String> {
    let mut result = String::with_capacity(input.len());

    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = context
                    .resolve(&name)
                    .ok_or(StarterError::UnresolvedVariable { name: name.clone() })?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}
