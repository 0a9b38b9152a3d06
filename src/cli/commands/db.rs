//! Database command implementation.
//!
//! Rails tasks go through [`Project::rails`], so production runs them in
//! the `web` service. Dumps and restores talk to the `db` service directly
//! with `pg_dump` and `psql`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::cli::args::{DbArgs, DbSubcommand, SnapshotArgs};
use crate::error::Result;
use crate::fsutil::{commit_private, create_private_dir, temp_sibling};
use crate::project::{Environment, Project};
use crate::shell::{CommandSpec, StdinSource};
use crate::ui::{confirm, UserInterface};

use super::dispatcher::{Command, CommandResult};

const STDIO: &str = "-";
const SNAPSHOT_EXT: &str = "sql";

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d_%H%M%S").to_string()
}

fn size_mb(path: &Path) -> f64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0) as f64 / 1024.0 / 1024.0
}

/// A snapshot file found on disk.
#[derive(Debug, Clone)]
struct SnapshotEntry {
    name: String,
    path: PathBuf,
    size: u64,
    modified: SystemTime,
}

fn list_snapshots(dir: &Path) -> Vec<SnapshotEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let path = e.path();
            if path.extension().and_then(|x| x.to_str()) != Some(SNAPSHOT_EXT) {
                return None;
            }
            let meta = e.metadata().ok()?;
            Some(SnapshotEntry {
                name: path.file_stem()?.to_string_lossy().into_owned(),
                size: meta.len(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                path,
            })
        })
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    found
}

/// The database command implementation.
pub struct DbCommand<'a> {
    project: &'a Project,
    args: DbArgs,
}

impl<'a> DbCommand<'a> {
    pub fn new(project: &'a Project, args: DbArgs) -> Self {
        Self { project, args }
    }

    fn rails_task(
        &self,
        ui: &mut dyn UserInterface,
        task: &[String],
        failure: &str,
    ) -> Result<Option<CommandResult>> {
        let result = self.project.run(&self.project.rails(task))?;
        if result.success {
            Ok(None)
        } else {
            ui.error(failure);
            Ok(Some(CommandResult::failure(result.exit_code.unwrap_or(1))))
        }
    }

    fn simple_task(
        &self,
        ui: &mut dyn UserInterface,
        task: &str,
        progress: &str,
        failure: &str,
        done: &str,
    ) -> Result<CommandResult> {
        ui.message(progress);
        if let Some(failed) = self.rails_task(ui, &[task.to_string()], failure)? {
            return Ok(failed);
        }
        ui.success(done);
        Ok(CommandResult::success())
    }

    fn confirmed(&self, ui: &mut dyn UserInterface, key: &str, question: &str) -> Result<bool> {
        if confirm(ui, key, question, false)? {
            return Ok(true);
        }
        ui.message("Cancelled");
        Ok(false)
    }

    fn rollback(&self, ui: &mut dyn UserInterface, steps: u32) -> Result<CommandResult> {
        if !self.confirmed(ui, "db_rollback", &format!("Rollback {} migration(s)?", steps))? {
            return Ok(CommandResult::success());
        }
        ui.message(&format!("Rolling back {} migration(s)...", steps));
        let task = ["db:rollback".to_string(), format!("STEP={}", steps)];
        if let Some(failed) = self.rails_task(ui, &task, "Failed to rollback migrations")? {
            return Ok(failed);
        }
        ui.success("Rollback complete");
        Ok(CommandResult::success())
    }

    fn console(&self) -> Result<CommandResult> {
        let spec = match self.project.environment() {
            Environment::Production => self
                .project
                .compose(Environment::Production, ["exec", "db", "psql", "-U", "postgres"]),
            Environment::Development => self.project.rails(["dbconsole"]),
        };
        let result = self.project.run(&spec)?;
        if result.success {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(result.exit_code.unwrap_or(1)))
        }
    }

    /// `pg_dump` inside the `db` service, writing to stdout.
    fn dump_command(&self) -> CommandSpec {
        let env = self.project.environment();
        self.project.compose(
            env,
            [
                "exec",
                "-T",
                "db",
                "pg_dump",
                "-U",
                "postgres",
                "-d",
                env.database_name(),
                "--clean",
                "--if-exists",
            ],
        )
    }

    fn psql_command(&self) -> CommandSpec {
        let env = self.project.environment();
        self.project.compose(
            env,
            ["exec", "-T", "db", "psql", "-U", "postgres", "-d", env.database_name()],
        )
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project.root().join(path)
        }
    }

    /// Dump into `path` with owner-only permissions. The dump goes to a
    /// temp sibling first; `path` is only replaced once `pg_dump` succeeds.
    fn dump_to(&self, path: &Path) -> Result<std::result::Result<(), Option<i32>>> {
        let tmp = temp_sibling(path);
        let result = self.project.run(&self.dump_command().stdout_to(&tmp));
        let result = match result {
            Ok(result) if result.success => result,
            other => {
                let _ = fs::remove_file(&tmp);
                return other.map(|r| Err(r.exit_code));
            }
        };
        if tmp.exists() {
            commit_private(&tmp, path)?;
        }
        tracing::debug!("Dump written to {} ({} bytes)", path.display(), result.stdout.len());
        Ok(Ok(()))
    }

    fn backup(&self, ui: &mut dyn UserInterface, output: Option<&str>) -> Result<CommandResult> {
        let name = output
            .map(str::to_string)
            .unwrap_or_else(|| format!("vulcan_backup_{}.sql", timestamp()));

        if name == STDIO {
            let result = self.project.run(&self.dump_command())?;
            if !result.success {
                ui.error(&format!(
                    "Backup failed: exit status {}",
                    result.exit_code.unwrap_or(1)
                ));
                return Ok(CommandResult::failure(result.exit_code.unwrap_or(1)));
            }
            return Ok(CommandResult::success());
        }

        ui.show_header("Database Backup");
        let path = self.resolve(&name);
        ui.message(&format!("Backing up to: {}", name));
        if let Err(code) = self.dump_to(&path)? {
            ui.error(&format!("Backup failed: exit status {}", code.unwrap_or(1)));
            return Ok(CommandResult::failure(code.unwrap_or(1)));
        }
        ui.success(&format!(
            "Backup complete: {} ({:.2} MB)",
            name,
            size_mb(&path)
        ));
        Ok(CommandResult::success())
    }

    fn restore(&self, ui: &mut dyn UserInterface, file: Option<&str>) -> Result<CommandResult> {
        let Some(file) = file.filter(|f| !f.is_empty()) else {
            ui.error("Please specify a backup file to restore");
            ui.show_hint("Usage: vulcan db restore backup.sql");
            return Ok(CommandResult::failure(1));
        };

        ui.show_header("Database Restore");

        let stdin = if file == STDIO {
            StdinSource::Inherit
        } else {
            let path = self.resolve(file);
            if !path.is_file() {
                ui.error(&format!("Failed to read backup file: {} not found", file));
                return Ok(CommandResult::failure(1));
            }
            StdinSource::File(path)
        };

        if !self.confirmed(ui, "db_restore", &format!("Restore database from {}?", file))? {
            return Ok(CommandResult::success());
        }

        ui.message("Restoring database...");
        let result = self.project.run(&self.psql_command().stdin(stdin))?;
        if !result.success {
            ui.error(&format!(
                "Restore failed: exit status {}",
                result.exit_code.unwrap_or(1)
            ));
            return Ok(CommandResult::failure(result.exit_code.unwrap_or(1)));
        }
        ui.success("Database restored successfully");
        Ok(CommandResult::success())
    }

    fn snapshot(&self, ui: &mut dyn UserInterface, args: &SnapshotArgs) -> Result<CommandResult> {
        let dir = self.project.snapshot_dir();
        create_private_dir(&dir)?;

        if args.list {
            ui.show_header("Database Snapshots");
            let snapshots = list_snapshots(&dir);
            if snapshots.is_empty() {
                ui.message("No snapshots found");
                ui.show_hint("Create one with: vulcan db snapshot [name]");
                return Ok(CommandResult::success());
            }
            for s in &snapshots {
                let modified: DateTime<Local> = s.modified.into();
                ui.message(&format!(
                    "  ● {} ({:.2} MB) - {}",
                    s.name,
                    s.size as f64 / 1024.0 / 1024.0,
                    modified.format("%Y-%m-%d %H:%M:%S")
                ));
            }
            return Ok(CommandResult::success());
        }

        if let Some(wanted) = &args.restore {
            let found = if wanted == "latest" {
                let latest = list_snapshots(&dir).into_iter().max_by_key(|s| s.modified);
                let Some(latest) = latest else {
                    ui.error("No snapshots found");
                    return Ok(CommandResult::failure(1));
                };
                latest.path
            } else {
                dir.join(format!("{}.{}", wanted, SNAPSHOT_EXT))
            };
            if !found.is_file() {
                ui.error(&format!("Snapshot not found: {}", wanted));
                ui.show_hint("Use --list to see available snapshots");
                return Ok(CommandResult::failure(1));
            }
            let file = found.to_string_lossy().into_owned();
            return self.restore(ui, Some(&file));
        }

        let name = args.name.clone().unwrap_or_else(timestamp);
        let path = dir.join(format!("{}.{}", name, SNAPSHOT_EXT));
        ui.show_header(&format!("Creating Snapshot: {}", name));

        if let Err(code) = self.dump_to(&path)? {
            ui.error(&format!("Snapshot failed: exit status {}", code.unwrap_or(1)));
            return Ok(CommandResult::failure(code.unwrap_or(1)));
        }
        ui.success(&format!(
            "Snapshot created: {} ({:.2} MB)",
            name,
            size_mb(&path)
        ));
        ui.show_hint(&format!("Restore with: vulcan db snapshot --restore {}", name));
        Ok(CommandResult::success())
    }
}

impl Command for DbCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            DbSubcommand::Migrate => self.simple_task(
                ui,
                "db:migrate",
                "Running migrations...",
                "Failed to run migrations",
                "Migrations complete",
            ),
            DbSubcommand::Rollback { steps } => self.rollback(ui, *steps),
            DbSubcommand::Seed => self.simple_task(
                ui,
                "db:seed",
                "Seeding database...",
                "Failed to seed database",
                "Seeding complete",
            ),
            DbSubcommand::Reset => {
                if !self.confirmed(ui, "db_reset", "Reset database?")? {
                    return Ok(CommandResult::success());
                }
                self.simple_task(
                    ui,
                    "db:reset",
                    "Resetting database...",
                    "Failed to reset database",
                    "Database reset complete",
                )
            }
            DbSubcommand::Create => self.simple_task(
                ui,
                "db:create",
                "Creating database...",
                "Failed to create database",
                "Database created",
            ),
            DbSubcommand::Drop => {
                if !self.confirmed(ui, "db_drop", "Drop database? All data will be lost.")? {
                    return Ok(CommandResult::success());
                }
                self.simple_task(
                    ui,
                    "db:drop",
                    "Dropping database...",
                    "Failed to drop database",
                    "Database dropped",
                )
            }
            DbSubcommand::Status => {
                ui.message("Migration status:");
                match self.rails_task(
                    ui,
                    &["db:migrate:status".to_string()],
                    "Failed to get migration status",
                )? {
                    Some(failed) => Ok(failed),
                    None => Ok(CommandResult::success()),
                }
            }
            DbSubcommand::Console => self.console(),
            DbSubcommand::Backup { output } => self.backup(ui, output.as_deref()),
            DbSubcommand::Restore { file, file_flag } => {
                self.restore(ui, file_flag.as_deref().or(file.as_deref()))
            }
            DbSubcommand::Snapshot(args) => self.snapshot(ui, args),
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
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup(env_content: Option<&str>) -> (TempDir, Rc<MockRunner>, Project) {
        let temp = TempDir::new().unwrap();
        if let Some(content) = env_content {
            fs::write(temp.path().join(".env"), content).unwrap();
        }
        let runner = Rc::new(MockRunner::new());
        let project = Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(runner.clone())
            .with_container_marker(temp.path().join("no-dockerenv"));
        (temp, runner, project)
    }

    fn db(project: &Project, command: DbSubcommand, ui: &mut MockUI) -> CommandResult {
        DbCommand::new(project, DbArgs { command })
            .execute(ui)
            .unwrap()
    }

    #[test]
    fn migrate_uses_bundle_exec_in_development() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(&project, DbSubcommand::Migrate, &mut ui);

        assert!(result.success);
        assert_eq!(runner.command_lines(), vec!["bundle exec rails db:migrate"]);
        assert!(ui.has_success("Migrations complete"));
    }

    #[test]
    fn migrate_runs_in_web_service_in_production() {
        let (_temp, runner, project) = setup(Some("RAILS_ENV=production\n"));
        let mut ui = MockUI::new();

        db(&project, DbSubcommand::Migrate, &mut ui);

        assert_eq!(
            runner.command_lines(),
            vec!["docker compose exec web bin/rails db:migrate"]
        );
    }

    #[test]
    fn migrate_uses_bin_rails_inside_container() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        let project = Project::new(temp.path())
            .with_env(HashMap::from([("BUNDLE_PATH".to_string(), "/usr/local/bundle".to_string())]))
            .with_runner(runner.clone())
            .with_container_marker(temp.path().join("no-dockerenv"));
        let mut ui = MockUI::new();

        db(&project, DbSubcommand::Migrate, &mut ui);

        assert_eq!(runner.command_lines(), vec!["bin/rails db:migrate"]);
    }

    #[test]
    fn migrate_failure_propagates_exit_code() {
        let (_temp, runner, project) = setup(None);
        runner.respond(
            "bundle exec rails",
            crate::shell::CommandResult::failure(Some(3), ""),
        );
        let mut ui = MockUI::new();

        let result = db(&project, DbSubcommand::Migrate, &mut ui);

        assert_eq!(result.exit_code, 3);
        assert!(ui.has_error("Failed to run migrations"));
    }

    #[test]
    fn rollback_passes_step_count() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();
        ui.set_prompt_response("db_rollback", "yes");

        db(&project, DbSubcommand::Rollback { steps: 3 }, &mut ui);

        assert_eq!(
            runner.command_lines(),
            vec!["bundle exec rails db:rollback STEP=3"]
        );
        assert!(ui.has_message("Rolling back 3 migration(s)..."));
    }

    #[test]
    fn reset_declined_runs_nothing() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(&project, DbSubcommand::Reset, &mut ui);

        assert!(result.success);
        assert!(runner.calls().is_empty());
        assert!(ui.has_message("Cancelled"));
    }

    #[test]
    fn drop_confirmed() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();
        ui.set_prompt_response("db_drop", "yes");

        db(&project, DbSubcommand::Drop, &mut ui);

        assert!(runner.ran("bundle exec rails db:drop"));
        assert!(ui.has_success("Database dropped"));
    }

    #[test]
    fn console_in_production_opens_psql() {
        let (_temp, runner, project) = setup(Some("RAILS_ENV=production\n"));
        let mut ui = MockUI::new();

        db(&project, DbSubcommand::Console, &mut ui);

        assert_eq!(
            runner.command_lines(),
            vec!["docker compose exec db psql -U postgres"]
        );
    }

    #[test]
    fn backup_dumps_development_database_to_file() {
        let (temp, runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(
            &project,
            DbSubcommand::Backup {
                output: Some("dump.sql".into()),
            },
            &mut ui,
        );

        assert!(result.success);
        let spec = runner.find("docker compose").unwrap();
        assert_eq!(
            spec.display(),
            "docker compose -f docker-compose.dev.yml exec -T db pg_dump -U postgres \
             -d vulcan_vue_development --clean --if-exists"
        );
        assert_eq!(
            spec.stdout,
            crate::shell::StdoutTarget::File(temp_sibling(&temp.path().join("dump.sql")))
        );
        assert!(ui.has_success("Backup complete: dump.sql (0.00 MB)"));
    }

    #[test]
    fn backup_to_stdout_inherits() {
        let (_temp, runner, project) = setup(Some("RAILS_ENV=production\n"));
        let mut ui = MockUI::new();

        db(
            &project,
            DbSubcommand::Backup {
                output: Some("-".into()),
            },
            &mut ui,
        );

        let spec = runner.find("docker compose exec -T db pg_dump").unwrap();
        assert!(spec.args.contains(&"vulcan_postgres_production".to_string()));
        assert_eq!(spec.stdout, crate::shell::StdoutTarget::Inherit);
        assert!(ui.headers().is_empty());
    }

    #[test]
    fn backup_default_name_is_timestamped() {
        let (_temp, _runner, project) = setup(None);
        let mut ui = MockUI::new();

        db(&project, DbSubcommand::Backup { output: None }, &mut ui);

        assert!(ui.has_message("Backing up to: vulcan_backup_"));
    }

    #[test]
    fn failed_backup_keeps_existing_file() {
        let (temp, runner, project) = setup(None);
        fs::write(temp.path().join("dump.sql"), "yesterday").unwrap();
        runner.fail("docker compose");
        let mut ui = MockUI::new();

        let result = db(
            &project,
            DbSubcommand::Backup {
                output: Some("dump.sql".into()),
            },
            &mut ui,
        );

        assert_eq!(result.exit_code, 1);
        assert_eq!(fs::read_to_string(temp.path().join("dump.sql")).unwrap(), "yesterday");
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        assert!(ui.has_error("Backup failed"));
    }

    #[test]
    fn restore_without_file_fails() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(
            &project,
            DbSubcommand::Restore {
                file: None,
                file_flag: None,
            },
            &mut ui,
        );

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Please specify a backup file to restore"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn restore_pipes_file_into_psql() {
        let (temp, runner, project) = setup(None);
        fs::write(temp.path().join("dump.sql"), "SELECT 1;").unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("db_restore", "yes");

        let result = db(
            &project,
            DbSubcommand::Restore {
                file: None,
                file_flag: Some("dump.sql".into()),
            },
            &mut ui,
        );

        assert!(result.success);
        let spec = runner.find("docker compose").unwrap();
        assert_eq!(
            spec.display(),
            "docker compose -f docker-compose.dev.yml exec -T db psql -U postgres -d vulcan_vue_development"
        );
        assert_eq!(spec.stdin, StdinSource::File(temp.path().join("dump.sql")));
        assert!(ui.has_success("Database restored successfully"));
    }

    #[test]
    fn restore_declined() {
        let (temp, runner, project) = setup(None);
        fs::write(temp.path().join("dump.sql"), "SELECT 1;").unwrap();
        let mut ui = MockUI::new();

        db(
            &project,
            DbSubcommand::Restore {
                file: Some("dump.sql".into()),
                file_flag: None,
            },
            &mut ui,
        );

        assert!(runner.calls().is_empty());
        assert!(ui.has_message("Cancelled"));
    }

    #[test]
    fn restore_from_stdin() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();
        ui.set_prompt_response("db_restore", "yes");

        db(
            &project,
            DbSubcommand::Restore {
                file: Some("-".into()),
                file_flag: None,
            },
            &mut ui,
        );

        assert_eq!(runner.find("docker compose").unwrap().stdin, StdinSource::Inherit);
    }

    #[test]
    fn snapshot_creates_private_directory() {
        let (temp, runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(
            &project,
            DbSubcommand::Snapshot(SnapshotArgs {
                name: Some("before-upgrade".into()),
                ..Default::default()
            }),
            &mut ui,
        );

        assert!(result.success);
        let dir = temp.path().join(".vulcan/snapshots");
        #[cfg(unix)]
        assert_eq!(crate::fsutil::mode_of(&dir).unwrap(), 0o700);
        let spec = runner.find("docker compose").unwrap();
        assert_eq!(
            spec.stdout,
            crate::shell::StdoutTarget::File(temp_sibling(&dir.join("before-upgrade.sql")))
        );
        assert!(ui.has_success("Snapshot created: before-upgrade"));
        assert!(ui.has_hint("vulcan db snapshot --restore before-upgrade"));
    }

    #[test]
    fn snapshot_list() {
        let (temp, _runner, project) = setup(None);
        let dir = temp.path().join(".vulcan/snapshots");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("first.sql"), "x").unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();
        let mut ui = MockUI::new();

        db(
            &project,
            DbSubcommand::Snapshot(SnapshotArgs {
                list: true,
                ..Default::default()
            }),
            &mut ui,
        );

        assert!(ui.has_message("● first (0.00 MB) - "));
        assert!(!ui.has_message("notes"));
    }

    #[test]
    fn snapshot_list_empty() {
        let (_temp, _runner, project) = setup(None);
        let mut ui = MockUI::new();

        db(
            &project,
            DbSubcommand::Snapshot(SnapshotArgs {
                list: true,
                ..Default::default()
            }),
            &mut ui,
        );

        assert!(ui.has_message("No snapshots found"));
    }

    #[test]
    fn restore_latest_snapshot_picks_newest() {
        let (temp, runner, project) = setup(None);
        let dir = temp.path().join(".vulcan/snapshots");
        fs::create_dir_all(&dir).unwrap();
        let now = SystemTime::now();
        for (name, age) in [("old", 3600), ("new", 10), ("middle", 600)] {
            let path = dir.join(format!("{}.sql", name));
            fs::write(&path, "x").unwrap();
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(now - Duration::from_secs(age))
                .unwrap();
        }
        let mut ui = MockUI::new();
        ui.set_prompt_response("db_restore", "yes");

        db(
            &project,
            DbSubcommand::Snapshot(SnapshotArgs {
                restore: Some("latest".into()),
                ..Default::default()
            }),
            &mut ui,
        );

        let spec = runner.find("docker compose").unwrap();
        assert_eq!(spec.stdin, StdinSource::File(dir.join("new.sql")));
    }

    #[test]
    fn restore_missing_snapshot() {
        let (_temp, runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(
            &project,
            DbSubcommand::Snapshot(SnapshotArgs {
                restore: Some("nope".into()),
                ..Default::default()
            }),
            &mut ui,
        );

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Snapshot not found: nope"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn restore_latest_without_snapshots() {
        let (_temp, _runner, project) = setup(None);
        let mut ui = MockUI::new();

        let result = db(
            &project,
            DbSubcommand::Snapshot(SnapshotArgs {
                restore: Some("latest".into()),
                ..Default::default()
            }),
            &mut ui,
        );

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("No snapshots found"));
    }
}
