//! Commands run by development setup.

use crate::project::{Project, DEV_COMPOSE_FILE};
use crate::shell::CommandSpec;

/// One external command with a progress title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupStep {
    /// Spinner text, ending in `...`.
    pub title: &'static str,
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl SetupStep {
    /// Title without the trailing ellipsis, for success lines.
    pub fn done_title(&self) -> &'static str {
        self.title.trim_end_matches("...")
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn spec(&self, project: &Project) -> CommandSpec {
        project.command(self.program, self.args.iter().copied())
    }
}

/// Tools that must answer before anything is installed.
pub const PREREQUISITES: &[SetupStep] = &[
    SetupStep {
        title: "Docker",
        program: "docker",
        args: &["info"],
    },
    SetupStep {
        title: "Ruby",
        program: "ruby",
        args: &["--version"],
    },
    SetupStep {
        title: "pnpm",
        program: "pnpm",
        args: &["--version"],
    },
];

/// Development bootstrap, in order.
pub const DEV_STEPS: &[SetupStep] = &[
    SetupStep {
        title: "Starting PostgreSQL with Docker...",
        program: "docker",
        args: &["compose", "-f", DEV_COMPOSE_FILE, "up", "-d"],
    },
    SetupStep {
        title: "Installing Ruby dependencies...",
        program: "bundle",
        args: &["install"],
    },
    SetupStep {
        title: "Installing JavaScript dependencies...",
        program: "pnpm",
        args: &["install"],
    },
    SetupStep {
        title: "Building frontend assets...",
        program: "pnpm",
        args: &["build"],
    },
    SetupStep {
        title: "Preparing database...",
        program: "bundle",
        args: &["exec", "rails", "db:prepare"],
    },
];
