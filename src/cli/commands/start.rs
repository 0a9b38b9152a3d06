//! Start command implementation.

use crate::cli::args::StartArgs;
use crate::config::FlagOverrides;
use crate::error::Result;
use crate::project::{Environment, Project, PROCFILE_DEV};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The start command implementation.
pub struct StartCommand<'a> {
    project: &'a Project,
    args: StartArgs,
}

impl<'a> StartCommand<'a> {
    pub fn new(project: &'a Project, args: StartArgs) -> Self {
        Self { project, args }
    }

    /// True if the dev compose stack reports `db` as running.
    fn database_running(&self) -> Result<bool> {
        let ps = self
            .project
            .compose(
                Environment::Development,
                ["ps", "--services", "--filter", "status=running"],
            )
            .capture();
        let result = self.project.run(&ps)?;
        Ok(result.success && result.stdout.lines().any(|s| s.trim() == "db"))
    }

    fn development(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Starting Vulcan (Development)");

        if self.database_running()? {
            ui.success("PostgreSQL already running");
        } else {
            ui.message("Starting PostgreSQL...");
            let up = self
                .project
                .compose(Environment::Development, ["up", "-d"])
                .capture();
            let result = self.project.run(&up)?;
            if !result.success {
                let detail = result.stderr.trim();
                ui.error(&format!(
                    "Failed to start PostgreSQL: {}",
                    if detail.is_empty() { "docker compose up failed" } else { detail }
                ));
                return Ok(CommandResult::failure(1));
            }
            ui.success("PostgreSQL started");
        }

        let port = self
            .project
            .snapshot(FlagOverrides::default())
            .map(|s| s.settings().ports.web)
            .unwrap_or(3000);
        ui.message("Starting Rails and asset watcher...");
        ui.message(&format!("Access Vulcan at http://localhost:{}", port));
        ui.show_hint("Press Ctrl+C to stop");

        let foreman = self.project.command("foreman", ["start", "-f", PROCFILE_DEV]);
        let result = self.project.run(&foreman)?;
        if result.success {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(result.exit_code.unwrap_or(1)))
        }
    }

    fn production(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Starting Vulcan (Production)");

        let mut args = vec!["up"];
        if self.args.daemon {
            args.push("-d");
        }
        let up = self.project.compose(Environment::Production, args);
        let result = self.project.run(&up)?;
        if !result.success {
            ui.error(&format!(
                "Failed to start services: exit status {}",
                result.exit_code.unwrap_or(1)
            ));
            return Ok(CommandResult::failure(1));
        }

        if self.args.daemon {
            ui.success("Vulcan started in background");
            ui.show_hint("View logs with: vulcan logs");
            ui.show_hint("Check status with: vulcan status");
        }
        Ok(CommandResult::success())
    }
}

impl Command for StartCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.project.environment() {
            Environment::Development => self.development(ui),
            Environment::Production => self.production(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandResult as RunResult, MockRunner};
    use crate::ui::MockUI;
    use std::collections::HashMap;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn setup(env: &str) -> (TempDir, Rc<MockRunner>, Project) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), env).unwrap();
        let runner = Rc::new(MockRunner::new());
        let project = Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(runner.clone());
        (temp, runner, project)
    }

    const PS: &str = "docker compose -f docker-compose.dev.yml ps --services --filter status=running";

    #[test]
    fn dev_starts_database_when_stopped() {
        let (_temp, runner, project) = setup("PORT=3100\n");
        runner.respond(PS, RunResult::success("redis\n"));
        let mut ui = MockUI::new();

        let result = StartCommand::new(&project, StartArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_success("PostgreSQL started"));
        assert!(ui.has_message("Access Vulcan at http://localhost:3100"));
        assert_eq!(
            runner.command_lines(),
            vec![
                PS,
                "docker compose -f docker-compose.dev.yml up -d",
                "foreman start -f Procfile.dev",
            ]
        );
    }

    #[test]
    fn dev_skips_running_database() {
        let (_temp, runner, project) = setup("");
        runner.respond(PS, RunResult::success("db\n"));
        let mut ui = MockUI::new();

        StartCommand::new(&project, StartArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_success("PostgreSQL already running"));
        assert!(!runner.ran("docker compose -f docker-compose.dev.yml up"));
        assert!(runner.ran("foreman start"));
    }

    #[test]
    fn dev_database_failure_stops_start() {
        let (_temp, runner, project) = setup("");
        runner.respond(
            "docker compose -f docker-compose.dev.yml up",
            RunResult::failure(Some(1), "port is already allocated\n"),
        );
        let mut ui = MockUI::new();

        let result = StartCommand::new(&project, StartArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Failed to start PostgreSQL: port is already allocated"));
        assert!(!runner.ran("foreman"));
    }

    #[test]
    fn production_daemon() {
        let (_temp, runner, project) = setup("RAILS_ENV=production\n");
        let mut ui = MockUI::new();

        let result = StartCommand::new(&project, StartArgs { daemon: true })
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(runner.command_lines(), vec!["docker compose up -d"]);
        assert!(ui.has_success("Vulcan started in background"));
    }

    #[test]
    fn production_foreground() {
        let (_temp, runner, project) = setup("RAILS_ENV=production\n");
        let mut ui = MockUI::new();
        StartCommand::new(&project, StartArgs::default())
            .execute(&mut ui)
            .unwrap();
        assert_eq!(runner.command_lines(), vec!["docker compose up"]);
    }
}
