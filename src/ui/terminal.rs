//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, should_use_colors, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt,
    PromptResult, SpinnerHandle, UserInterface, VulcanTheme,
};

/// Colored output on stdout, `dialoguer` prompts and `indicatif` spinners.
pub struct TerminalUI {
    term: Term,
    theme: VulcanTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        let theme = match should_use_colors() {
            true => VulcanTheme::new(),
            false => VulcanTheme::plain(),
        };
        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }

    fn line(&self, text: impl std::fmt::Display) {
        if self.mode.shows_status() {
            let _ = writeln!(&self.term, "{}", text);
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.line(msg);
    }

    fn success(&mut self, msg: &str) {
        self.line(self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        self.line(self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        let _ = writeln!(Term::stderr(), "{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = match self.mode.shows_spinners() {
            true => ProgressSpinner::new(message, self.theme.clone()),
            false => ProgressSpinner::hidden(),
        };
        Box::new(spinner)
    }

    fn show_header(&mut self, title: &str) {
        self.line(format_args!("\n{}\n", self.theme.format_header(title)));
    }

    fn show_hint(&mut self, hint: &str) {
        self.line(format_args!("  {}", self.theme.hint.apply_to(hint)));
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
///
/// The terminal UI is used only when `interactive` is requested, stdout is
/// a TTY, and the process is not running under CI.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() && !crate::shell::is_ci() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
