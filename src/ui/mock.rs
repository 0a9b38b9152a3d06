//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use vulcan::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("save", "yes");
//!
//! ui.message("  PORT = 3000");
//! ui.success("Configuration updated");
//!
//! assert!(ui.has_message("PORT = 3000"));
//! assert!(ui.has_success("Configuration updated"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface};

/// How a spinner ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
}

type Finished = Rc<RefCell<Vec<(SpinnerStatus, String)>>>;

/// Records every line a command prints, keyed by kind.
///
/// Prompts are answered from queued responses (`queue_prompt_responses`),
/// then a fixed response (`set_prompt_response`), then the prompt default.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Vec<String>,
    finished: Finished,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Answers handed out one per call before falling back to
    /// `set_prompt_response`.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.prompt_queues.insert(
            key.to_string(),
            responses.into_iter().map(str::to_string).collect(),
        );
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Messages of every spinner started, in order.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Final lines of the spinners that have finished.
    pub fn spinner_results(&self) -> Vec<(SpinnerStatus, String)> {
        self.finished.borrow().clone()
    }

    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        contains(&self.messages, msg)
    }

    pub fn has_success(&self, msg: &str) -> bool {
        contains(&self.successes, msg)
    }

    pub fn has_error(&self, msg: &str) -> bool {
        contains(&self.errors, msg)
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        contains(&self.hints, msg)
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        contains(&self.warnings, msg)
    }

    /// True if any captured line of any kind contains `text`.
    pub fn has_output(&self, text: &str) -> bool {
        [
            &self.messages,
            &self.successes,
            &self.warnings,
            &self.errors,
            &self.headers,
            &self.hints,
        ]
        .into_iter()
        .any(|lines| contains(lines, text))
            || self.finished.borrow().iter().any(|(_, l)| l.contains(text))
    }

    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            interactive: self.interactive,
            prompt_responses: std::mem::take(&mut self.prompt_responses),
            prompt_queues: std::mem::take(&mut self.prompt_queues),
            ..Self::default()
        };
    }
}

fn contains(lines: &[String], text: &str) -> bool {
    lines.iter().any(|l| l.contains(text))
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let queued = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(VecDeque::pop_front);
        let response = queued
            .or_else(|| self.prompt_responses.get(&prompt.key).cloned())
            .or_else(|| prompt.default.clone())
            .unwrap_or_default();
        Ok(PromptResult::from_answer(&prompt.prompt_type, &response))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            finished: Rc::clone(&self.finished),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner handed out by [`MockUI`]; reports back into its owner.
#[derive(Debug)]
pub struct MockSpinner {
    finished: Finished,
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.finished
            .borrow_mut()
            .push((SpinnerStatus::Success, msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.finished
            .borrow_mut()
            .push((SpinnerStatus::Error, msg.to_string()));
    }
}
