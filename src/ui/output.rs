//! How much the CLI prints.

/// Output verbosity, picked from the global `--verbose` / `--quiet` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Status lines plus the raw output of subprocesses.
    Verbose,
    #[default]
    Normal,
    /// Status lines without spinners.
    Quiet,
    /// Errors only.
    Silent,
}

impl OutputMode {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    /// Long-running steps stream their subprocess output instead of
    /// hiding it behind a spinner.
    pub fn shows_command_output(&self) -> bool {
        *self == Self::Verbose
    }

    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    pub fn shows_status(&self) -> bool {
        *self != Self::Silent
    }
}
