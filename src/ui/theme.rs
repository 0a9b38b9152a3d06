//! Terminal styles.

use console::Style;

/// Styles for the interactive terminal.
#[derive(Debug, Clone)]
pub struct VulcanTheme {
    pub success: Style,
    /// Orange, to separate it from errors on 256-color terminals.
    pub warning: Style,
    pub error: Style,
    pub header: Style,
    pub hint: Style,
}

impl Default for VulcanTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl VulcanTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// No styling at all; used when stdout is not a TTY or `NO_COLOR` is set.
    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            success: none.clone(),
            warning: none.clone(),
            error: none.clone(),
            header: none.clone(),
            hint: none,
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(format!("✓ {}", msg)).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.warning.apply_to(format!("⚠ {}", msg)).to_string()
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.error.apply_to(format!("✗ {}", msg)).to_string()
    }

    pub fn format_header(&self, title: &str) -> String {
        self.header.apply_to(title).to_string()
    }
}

/// Colors are on for a TTY unless `NO_COLOR` is set (https://no-color.org/).
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term()
}
