//! Operator-facing user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait, passed to every command
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use vulcan::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Vulcan Configuration");
//! ui.success("Configuration updated");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, VulcanTheme};

use crate::error::{Result, VulcanError};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a dim follow-up hint.
    fn show_hint(&mut self, hint: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// A running spinner. Each one ends with exactly one finish call.
pub trait SpinnerHandle {
    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt. Non-interactive runs read
    /// `VULCAN_PROMPT_<KEY>` for the answer.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    fn new(key: &str, question: &str, prompt_type: PromptType) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type,
            default: None,
        }
    }

    pub fn confirm(key: &str, question: &str) -> Self {
        Self::new(key, question, PromptType::Confirm)
    }

    pub fn input(key: &str, question: &str) -> Self {
        Self::new(key, question, PromptType::Input)
    }

    pub fn password(key: &str, question: &str) -> Self {
        Self::new(key, question, PromptType::Password)
    }

    pub fn select(key: &str, question: &str, options: Vec<PromptOption>) -> Self {
        Self::new(key, question, PromptType::Select { options })
    }

    pub fn multi_select(key: &str, question: &str, options: Vec<PromptOption>) -> Self {
        Self::new(key, question, PromptType::MultiSelect { options })
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Text input that is not echoed.
    Password,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
    /// Select multiple from a list of options.
    MultiSelect { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl PromptOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Result of a prompt.
#[derive(Debug, Clone)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
    /// Multiple string results from multi-select.
    Strings(Vec<String>),
}

impl PromptResult {
    /// Interpret a textual answer (an env override, a canned test answer or
    /// a default) the way the prompt type expects.
    pub fn from_answer(prompt_type: &PromptType, text: &str) -> Self {
        match prompt_type {
            PromptType::Confirm => Self::Bool(is_affirmative(text)),
            PromptType::MultiSelect { .. } => Self::Strings(
                text.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => Self::String(text.to_string()),
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Strings(v) => v.join(","),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) => Some(is_affirmative(s)),
            Self::Strings(_) => None,
        }
    }

    pub fn into_strings(self) -> Vec<String> {
        match self {
            Self::Strings(v) => v,
            Self::String(s) if s.is_empty() => Vec::new(),
            Self::String(s) => s.split(',').map(|v| v.trim().to_string()).collect(),
            Self::Bool(b) => vec![b.to_string()],
        }
    }
}

/// Whether a textual answer means "yes".
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Ask a yes/no question.
pub fn confirm(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    default: bool,
) -> Result<bool> {
    let prompt = Prompt::confirm(key, question).with_default(default.to_string());
    let answer = ui.prompt(&prompt)?;
    answer.as_bool().ok_or_else(|| {
        VulcanError::validation(format!("Expected a yes/no answer for '{}'", key))
    })
}

/// Ask for a line of text. Answers are trimmed.
pub fn input(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    default: Option<&str>,
) -> Result<String> {
    let mut prompt = Prompt::input(key, question);
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    Ok(ui.prompt(&prompt)?.as_string().trim().to_string())
}

/// Ask for a secret value without echoing it.
pub fn password(ui: &mut dyn UserInterface, key: &str, question: &str) -> Result<String> {
    let prompt = Prompt::password(key, question).with_default("");
    Ok(ui.prompt(&prompt)?.as_string())
}

/// Pick one option; returns its value.
pub fn select(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    options: Vec<PromptOption>,
    default: Option<&str>,
) -> Result<String> {
    let fallback = default
        .map(str::to_string)
        .or_else(|| options.first().map(|o| o.value.clone()));
    let mut prompt = Prompt::select(key, question, options);
    if let Some(d) = fallback {
        prompt = prompt.with_default(d);
    }
    Ok(ui.prompt(&prompt)?.as_string())
}

/// Pick any number of options; returns their values.
pub fn multi_select(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    options: Vec<PromptOption>,
) -> Result<Vec<String>> {
    let prompt = Prompt::multi_select(key, question, options).with_default("");
    Ok(ui
        .prompt(&prompt)?
        .into_strings()
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect())
}
