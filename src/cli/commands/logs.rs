//! Logs command implementation.

use crate::cli::args::LogsArgs;
use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// `docker compose logs` with the user's tail and follow choices.
pub struct LogsCommand<'a> {
    project: &'a Project,
    args: LogsArgs,
}

impl<'a> LogsCommand<'a> {
    pub fn new(project: &'a Project, args: LogsArgs) -> Self {
        Self { project, args }
    }

    fn compose_args(&self) -> Vec<String> {
        let mut args = vec!["compose".to_string(), "logs".to_string()];
        if self.args.follow {
            args.push("-f".into());
        }
        args.push("--tail".into());
        args.push(self.args.lines.to_string());
        if let Some(service) = &self.args.service {
            args.push(service.clone());
        }
        args
    }
}

impl Command for LogsCommand<'_> {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let spec = self.project.command("docker", self.compose_args());
        let result = self.project.run(&spec)?;
        if result.success {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(result.exit_code.unwrap_or(1)))
        }
    }
}
