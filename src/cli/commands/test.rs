//! Test command implementation.

use std::str::FromStr;

use crate::cli::args::TestArgs;
use crate::error::{Result, VulcanError};
use crate::project::Project;
use crate::shell::CommandSpec;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Which test suite to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Backend,
    Frontend,
}

impl FromStr for Suite {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "backend" | "rspec" | "ruby" => Ok(Self::Backend),
            "frontend" | "vitest" | "js" => Ok(Self::Frontend),
            other => Err(VulcanError::validation(format!(
                "Unknown test suite: {}. Use 'backend' or 'frontend'",
                other
            ))),
        }
    }
}

/// Runs RSpec and Vitest from the project root.
pub struct TestCommand<'a> {
    project: &'a Project,
    args: TestArgs,
}

impl<'a> TestCommand<'a> {
    pub fn new(project: &'a Project, args: TestArgs) -> Self {
        Self { project, args }
    }

    fn backend_command(&self) -> CommandSpec {
        if self.args.no_parallel {
            self.project.command("bundle", ["exec", "rspec"])
        } else {
            self.project
                .command("bundle", ["exec", "parallel_rspec", "spec/"])
        }
    }

    fn frontend_command(&self, watch: bool) -> CommandSpec {
        let spec = self.project.command("pnpm", ["vitest"]);
        if watch {
            spec
        } else {
            spec.arg("run")
        }
    }

    /// Run one suite, reporting the outcome. Watch mode has no pass/fail.
    fn run_suite(&self, ui: &mut dyn UserInterface, suite: Suite, watch: bool) -> Result<bool> {
        let (spec, label) = match suite {
            Suite::Backend => (self.backend_command(), "Backend"),
            Suite::Frontend => (self.frontend_command(watch), "Frontend"),
        };
        let result = self.project.run(&spec)?;
        if watch {
            return Ok(true);
        }
        if result.success {
            ui.success(&format!("{} tests passed", label));
        } else {
            ui.error(&format!("{} tests failed", label));
        }
        Ok(result.success)
    }
}

impl Command for TestCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let suite = self.args.suite.as_deref().map(Suite::from_str).transpose()?;

        match suite {
            Some(Suite::Backend) => {
                ui.show_header("Running Backend Tests (RSpec)");
                let ok = self.run_suite(ui, Suite::Backend, false)?;
                Ok(if ok { CommandResult::success() } else { CommandResult::failure(1) })
            }
            Some(Suite::Frontend) => {
                ui.show_header("Running Frontend Tests (Vitest)");
                let ok = self.run_suite(ui, Suite::Frontend, self.args.watch)?;
                Ok(if ok { CommandResult::success() } else { CommandResult::failure(1) })
            }
            None => {
                ui.show_header("Running All Tests");
                for suite in [Suite::Frontend, Suite::Backend] {
                    if !self.run_suite(ui, suite, false)? {
                        return Ok(CommandResult::failure(1));
                    }
                }
                ui.success("All tests passed!");
                Ok(CommandResult::success())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use std::collections::HashMap;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn run(args: TestArgs, fail: Option<&str>) -> (Result<CommandResult>, Vec<String>, MockUI) {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        if let Some(prefix) = fail {
            runner.fail(prefix);
        }
        let project = Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(runner.clone());
        let mut ui = MockUI::new();
        let result = TestCommand::new(&project, args).execute(&mut ui);
        (result, runner.command_lines(), ui)
    }

    #[test]
    fn suite_aliases() {
        assert_eq!("rspec".parse::<Suite>().unwrap(), Suite::Backend);
        assert_eq!("Ruby".parse::<Suite>().unwrap(), Suite::Backend);
        assert_eq!("js".parse::<Suite>().unwrap(), Suite::Frontend);
        assert_eq!("vitest".parse::<Suite>().unwrap(), Suite::Frontend);
        assert!("cucumber".parse::<Suite>().is_err());
    }

    #[test]
    fn backend_runs_in_parallel_by_default() {
        let (result, lines, _ui) = run(
            TestArgs {
                suite: Some("backend".into()),
                ..Default::default()
            },
            None,
        );
        assert!(result.unwrap().success);
        assert_eq!(lines, vec!["bundle exec parallel_rspec spec/"]);
    }

    #[test]
    fn backend_serial() {
        let (_, lines, _ui) = run(
            TestArgs {
                suite: Some("rspec".into()),
                no_parallel: true,
                ..Default::default()
            },
            None,
        );
        assert_eq!(lines, vec!["bundle exec rspec"]);
    }

    #[test]
    fn frontend_watch_mode() {
        let (result, lines, ui) = run(
            TestArgs {
                suite: Some("frontend".into()),
                watch: true,
                ..Default::default()
            },
            Some("pnpm"),
        );
        assert!(result.unwrap().success);
        assert_eq!(lines, vec!["pnpm vitest"]);
        assert!(ui.successes().is_empty());
    }

    #[test]
    fn all_runs_frontend_then_backend() {
        let (result, lines, ui) = run(TestArgs::default(), None);
        assert!(result.unwrap().success);
        assert_eq!(
            lines,
            vec!["pnpm vitest run", "bundle exec parallel_rspec spec/"]
        );
        assert!(ui.has_success("All tests passed!"));
    }

    #[test]
    fn frontend_failure_skips_backend() {
        let (result, lines, ui) = run(TestArgs::default(), Some("pnpm"));
        assert_eq!(result.unwrap().exit_code, 1);
        assert_eq!(lines, vec!["pnpm vitest run"]);
        assert!(ui.has_error("Frontend tests failed"));
    }

    #[test]
    fn unknown_suite_is_rejected() {
        let (result, lines, _ui) = run(
            TestArgs {
                suite: Some("cucumber".into()),
                ..Default::default()
            },
            None,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Unknown test suite: cucumber"));
        assert!(lines.is_empty());
    }
}
