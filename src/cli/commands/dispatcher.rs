//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use clap::CommandFactory;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, returning the exit status to report.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project: Project,
}

impl CommandDispatcher {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Route the CLI subcommand to its implementation and run it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = &self.project;
        match &cli.command {
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Auth(args)) => {
                super::auth::AuthCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Setup(args)) => {
                super::setup::SetupCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Build(args)) => {
                super::build::BuildCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Start(args)) => {
                super::start::StartCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Stop) => super::stop::StopCommand::new(project).execute(ui),
            Some(Commands::Logs(args)) => {
                super::logs::LogsCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Status) => super::status::StatusCommand::new(project).execute(ui),
            Some(Commands::Db(args)) => super::db::DbCommand::new(project, args.clone()).execute(ui),
            Some(Commands::User(args)) => {
                super::user::UserCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Test(args)) => {
                super::test::TestCommand::new(project, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                Cli::command().print_help()?;
                Ok(CommandResult::success())
            }
        }
    }
}
