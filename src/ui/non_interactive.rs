//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, VulcanError};

use super::{OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface};

const PROMPT_ENV_PREFIX: &str = "VULCAN_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `VULCAN_PROMPT_<KEY>` variables, then from the
/// prompt default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn override_for(&self, key: &str) -> Option<&String> {
        let env_key = format!(
            "{}{}",
            PROMPT_ENV_PREFIX,
            key.to_uppercase().replace(['-', '.'], "_")
        );
        self.env_overrides.get(&env_key)
    }

    fn say(&self, line: std::fmt::Arguments<'_>) {
        if self.mode.shows_status() {
            println!("{}", line);
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.say(format_args!("{}", msg));
    }

    fn success(&mut self, msg: &str) {
        self.say(format_args!("✓ {}", msg));
    }

    // stderr, alongside errors
    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if let Some(value) = self.override_for(&prompt.key) {
            tracing::debug!("Prompt '{}' answered from environment", prompt.key);
            return Ok(PromptResult::from_answer(&prompt.prompt_type, value));
        }
        match &prompt.default {
            Some(default) => Ok(PromptResult::from_answer(&prompt.prompt_type, default)),
            None => Err(VulcanError::validation(format!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            ))),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner {
            show: self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.say(format_args!("\n{}\n", title));
    }

    fn show_hint(&mut self, hint: &str) {
        self.say(format_args!("  {}", hint));
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prints the outcome line only; there is no animation without a TTY.
struct LineSpinner {
    show: bool,
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui_with(pairs: &[(&str, &str)]) -> NonInteractiveUI {
        let overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NonInteractiveUI::with_overrides(OutputMode::Silent, overrides)
    }

    #[test]
    fn uses_prompt_default() {
        let mut ui = ui_with(&[]);
        let prompt = Prompt::input("web_port", "Web port").with_default("3000");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "3000");
    }

    #[test]
    fn environment_override_wins() {
        let mut ui = ui_with(&[("VULCAN_PROMPT_WEB_PORT", "4000")]);
        let prompt = Prompt::input("web_port", "Web port").with_default("3000");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "4000");
    }

    #[test]
    fn override_keys_normalize_dashes() {
        let mut ui = ui_with(&[("VULCAN_PROMPT_SETUP_OIDC", "yes")]);
        let prompt = Prompt::confirm("setup-oidc", "Configure OIDC?").with_default("false");
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn confirm_default_is_parsed() {
        let mut ui = ui_with(&[]);
        let prompt = Prompt::confirm("save", "Save?").with_default("false");
        assert!(matches!(ui.prompt(&prompt).unwrap(), PromptResult::Bool(false)));
    }

    #[test]
    fn multiselect_override_is_split() {
        let mut ui = ui_with(&[("VULCAN_PROMPT_ROTATE", "CIPHER_SALT,SECRET_KEY_BASE")]);
        let prompt = Prompt::multi_select("rotate", "Select", vec![]);
        assert_eq!(
            ui.prompt(&prompt).unwrap().into_strings(),
            vec!["CIPHER_SALT", "SECRET_KEY_BASE"]
        );
    }

    #[test]
    fn missing_answer_is_an_error() {
        let mut ui = ui_with(&[]);
        let err = ui.prompt(&Prompt::input("email", "Email")).unwrap_err();
        assert!(err.to_string().contains("non-interactive"));
    }

    #[test]
    fn never_interactive() {
        assert!(!ui_with(&[]).is_interactive());
    }
}
