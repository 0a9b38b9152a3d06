//! Stop command implementation.

use crate::error::Result;
use crate::project::Project;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// `docker compose down` for the detected environment.
pub struct StopCommand<'a> {
    project: &'a Project,
}

impl<'a> StopCommand<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }
}

impl Command for StopCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = self.project.environment();
        ui.show_header(&format!("Stopping Vulcan ({})", env));

        let result = self.project.run(&self.project.compose(env, ["down"]))?;
        if !result.success {
            ui.error("Failed to stop services");
            return Ok(CommandResult::failure(result.exit_code.unwrap_or(1)));
        }
        ui.success("Vulcan stopped");
        Ok(CommandResult::success())
    }
}
