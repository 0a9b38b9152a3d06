//! `dialoguer` prompts for the terminal UI.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

use crate::error::{Result, VulcanError};

use super::{is_affirmative, Prompt, PromptOption, PromptResult, PromptType};

fn io_err(e: dialoguer::Error) -> VulcanError {
    VulcanError::Io(e.into())
}

/// Ask `prompt` on `term` and wait for the answer.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    // dialoguer's default theme prints a yellow `?` before every question.
    let theme = ColorfulTheme {
        prompt_prefix: style(String::new()),
        ..ColorfulTheme::default()
    };
    let question = prompt.question.as_str();
    let default = prompt.default.as_deref();

    let result = match &prompt.prompt_type {
        PromptType::Confirm => PromptResult::Bool(
            Confirm::with_theme(&theme)
                .with_prompt(question)
                .default(default.map(is_affirmative).unwrap_or(true))
                .interact_on(term)
                .map_err(io_err)?,
        ),
        PromptType::Input => {
            let mut input = Input::<String>::with_theme(&theme)
                .with_prompt(question)
                .allow_empty(true);
            if let Some(d) = default.filter(|d| !d.is_empty()) {
                input = input.default(d.to_string());
            }
            PromptResult::String(input.interact_on(term).map_err(io_err)?)
        }
        PromptType::Password => PromptResult::String(
            Password::with_theme(&theme)
                .with_prompt(question)
                .allow_empty_password(true)
                .interact_on(term)
                .map_err(io_err)?,
        ),
        PromptType::Select { options } => {
            let labels = labels(prompt, options)?;
            let index = default
                .and_then(|d| options.iter().position(|o| o.value == d))
                .unwrap_or(0);
            let picked = Select::with_theme(&theme)
                .with_prompt(question)
                .items(&labels)
                .default(index)
                .interact_on(term)
                .map_err(io_err)?;
            PromptResult::String(options[picked].value.clone())
        }
        PromptType::MultiSelect { options } => {
            let preset: Vec<&str> = default.map(|d| d.split(',').collect()).unwrap_or_default();
            let checked: Vec<bool> = options
                .iter()
                .map(|o| preset.contains(&o.value.as_str()))
                .collect();
            let picked = MultiSelect::with_theme(&theme)
                .with_prompt(question)
                .items(&labels_of(options))
                .defaults(&checked)
                .interact_on(term)
                .map_err(io_err)?;
            PromptResult::Strings(picked.into_iter().map(|i| options[i].value.clone()).collect())
        }
    };
    Ok(result)
}

fn labels_of(options: &[PromptOption]) -> Vec<&str> {
    options.iter().map(|o| o.label.as_str()).collect()
}

/// A single-choice prompt needs at least one option to land on.
fn labels<'a>(prompt: &Prompt, options: &'a [PromptOption]) -> Result<Vec<&'a str>> {
    if options.is_empty() {
        return Err(VulcanError::validation(format!(
            "No options to choose from for '{}'",
            prompt.key
        )));
    }
    Ok(labels_of(options))
}
