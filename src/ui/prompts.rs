//! Interactive prompts backed by dialoguer.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::{Result, StarterError};

use super::{Prompt, PromptOption, PromptResult, PromptType};

fn map_dialoguer_err(e: dialoguer::Error) -> StarterError {
    StarterError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input on `term`.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    match &prompt.prompt_type {
        PromptType::Confirm => {
            let default = prompt
                .default
                .as_deref()
                .and_then(|d| PromptResult::from_answer(&PromptType::Confirm, d).as_bool())
                .unwrap_or(true);
            let answer = Confirm::with_theme(&theme)
                .with_prompt(&prompt.question)
                .default(default)
                .interact_on(term)
                .map_err(map_dialoguer_err)?;
            Ok(PromptResult::Bool(answer))
        }
        PromptType::Input => {
            let mut input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);
            if let Some(default) = &prompt.default {
                input = input.default(default.clone());
            }
            let answer = input.interact_on(term).map_err(map_dialoguer_err)?;
            Ok(PromptResult::String(answer))
        }
        PromptType::Select { options } => {
            let selection = Select::with_theme(&theme)
                .with_prompt(&prompt.question)
                .items(&labels(options))
                .default(default_index(prompt, options))
                .interact_on(term)
                .map_err(map_dialoguer_err)?;
            Ok(PromptResult::String(options[selection].value.clone()))
        }
        PromptType::MultiSelect { options } => {
            let selections = MultiSelect::with_theme(&theme)
                .with_prompt(&prompt.question)
                .items(&labels(options))
                .defaults(&default_flags(prompt, options))
                .interact_on(term)
                .map_err(map_dialoguer_err)?;
            Ok(PromptResult::Strings(
                selections
                    .iter()
                    .map(|&i| options[i].value.clone())
                    .collect(),
            ))
        }
    }
}

fn labels(options: &[PromptOption]) -> Vec<&str> {
    options.iter().map(|o| o.label.as_str()).collect()
}

/// Index of the option whose value matches the prompt default.
fn default_index(prompt: &Prompt, options: &[PromptOption]) -> usize {
    prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0)
}

/// Pre-checked flags for a multi-select from a comma-separated default.
fn default_flags(prompt: &Prompt, options: &[PromptOption]) -> Vec<bool> {
    let defaults: Vec<&str> = prompt
        .default
        .as_deref()
        .map(|d| d.split(',').map(str::trim).collect())
        .unwrap_or_default();
    options
        .iter()
        .map(|o| defaults.contains(&o.value.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<PromptOption> {
        ["npm", "pnpm", "yarn"]
            .iter()
            .map(|v| PromptOption {
                label: v.to_uppercase(),
                value: v.to_string(),
            })
            .collect()
    }

    fn prompt(default: Option<&str>) -> Prompt {
        Prompt {
            key: "pm".into(),
            question: "Package manager?".into(),
            prompt_type: PromptType::Select { options: options() },
            default: default.map(String::from),
        }
    }

    #[test]
    fn default_index_matches_value() {
        assert_eq!(default_index(&prompt(Some("yarn")), &options()), 2);
    }

    #[test]
    fn default_index_falls_back_to_first() {
        assert_eq!(default_index(&prompt(None), &options()), 0);
        assert_eq!(default_index(&prompt(Some("bun")), &options()), 0);
    }

    #[test]
    fn default_flags_from_comma_list() {
        assert_eq!(
            default_flags(&prompt(Some("npm, yarn")), &options()),
            vec![true, false, true]
        );
    }

    #[test]
    fn labels_follow_option_order() {
        assert_eq!(labels(&options()), vec!["NPM", "PNPM", "YARN"]);
    }
}
