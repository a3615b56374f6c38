//! Visual theme and styling.

use console::Style;

/// Terminal styles for starters output.
#[derive(Debug, Clone)]
pub struct StarterTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for rules framing streamed output (blue).
    pub rule: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for commands the user should run (white).
    pub command: Style,
}

impl Default for StarterTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl StarterTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            rule: Style::new().blue(),
            dim: Style::new().dim(),
            command: Style::new().white(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            rule: Style::new(),
            dim: Style::new(),
            command: Style::new(),
        }
    }

    /// Format a success message.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format the rule printed around streamed clone output.
    pub fn format_rule(&self) -> String {
        format!("{}", self.rule.apply_to("=".repeat(31)))
    }

    /// Format a shell hint such as `$ cd app`.
    pub fn format_shell_hint(&self, program: &str, arg: &str) -> String {
        format!(
            "  {} {} {}",
            self.dim.apply_to("$"),
            self.command.apply_to(program),
            arg
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_messages() {
        let theme = StarterTheme::plain();
        assert_eq!(theme.format_success("Done"), "✓ Done");
        assert_eq!(theme.format_warning("Careful"), "⚠ Careful");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
    }

    #[test]
    fn rule_is_fixed_width() {
        let theme = StarterTheme::plain();
        assert_eq!(theme.format_rule().chars().count(), 31);
    }

    #[test]
    fn shell_hint_layout() {
        let theme = StarterTheme::plain();
        assert_eq!(theme.format_shell_hint("cd", "app"), "  $ cd app");
    }

    #[test]
    fn colored_theme_creates_without_panic() {
        let _ = StarterTheme::default().format_success("test");
    }
}
