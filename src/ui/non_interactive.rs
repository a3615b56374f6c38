//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, StarterError};

use super::{OutputMode, Prompt, PromptResult, SpinnerHandle, StarterTheme, UserInterface};

/// Prefix of environment variables that answer prompts without a terminal.
pub const PROMPT_ENV_PREFIX: &str = "STARTERS_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `STARTERS_PROMPT_<KEY>` variables, then from
/// the prompt default; a prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    overrides: HashMap<String, String>,
    theme: StarterTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI reading overrides from the environment.
    pub fn new(mode: OutputMode) -> Self {
        let overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self::with_overrides(mode, overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            overrides,
            theme: StarterTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_warnings() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn rule(&mut self) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_rule());
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.overrides.get(&env_key) {
            return Ok(PromptResult::from_answer(&prompt.prompt_type, value));
        }

        if let Some(default) = &prompt.default {
            return Ok(PromptResult::from_answer(&prompt.prompt_type, default));
        }

        Err(StarterError::Other(anyhow::anyhow!(
            "Cannot prompt for '{}' in non-interactive mode (set {} or give the prompt a default)",
            prompt.key,
            env_key
        )))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner {
            mode: self.mode,
            theme: self.theme.clone(),
        })
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only its final line.
struct LineSpinner {
    mode: OutputMode,
    theme: StarterTheme,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  {}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  {}", self.theme.format_error(msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{PromptOption, PromptType};

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn env_override_answers_prompt() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Silent,
            overrides(&[("STARTERS_PROMPT_PROJECT_NAME", "web")]),
        );

        let result = ui
            .prompt(&Prompt::input("project_name", "Name?").with_default("app"))
            .unwrap();

        assert_eq!(result, PromptResult::String("web".into()));
    }

    #[test]
    fn default_used_without_override() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());

        let result = ui
            .prompt(&Prompt::input("project_name", "Name?").with_default("app"))
            .unwrap();

        assert_eq!(result, PromptResult::String("app".into()));
    }

    #[test]
    fn confirm_override_is_boolean() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Silent,
            overrides(&[("STARTERS_PROMPT_GIT", "yes")]),
        );
        let prompt = Prompt {
            key: "git".into(),
            question: "Init git?".into(),
            prompt_type: PromptType::Confirm,
            default: None,
        };

        assert_eq!(ui.prompt(&prompt).unwrap(), PromptResult::Bool(true));
    }

    #[test]
    fn multiselect_default_splits() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());
        let prompt = Prompt {
            key: "features".into(),
            question: "Features?".into(),
            prompt_type: PromptType::MultiSelect {
                options: vec![PromptOption {
                    label: "Lint".into(),
                    value: "lint".into(),
                }],
            },
            default: Some("lint,test".into()),
        };

        assert_eq!(
            ui.prompt(&prompt).unwrap(),
            PromptResult::Strings(vec!["lint".into(), "test".into()])
        );
    }

    #[test]
    fn prompt_without_answer_fails() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());

        let err = ui.prompt(&Prompt::input("name", "Name?")).unwrap_err();

        assert!(err.to_string().contains("STARTERS_PROMPT_NAME"));
    }

    #[test]
    fn is_never_interactive() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert!(!ui.is_interactive());
    }
}
