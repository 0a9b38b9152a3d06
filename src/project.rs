//! The project a command operates on.
//!
//! [`Project`] bundles the application root with the things every command
//! needs to reach outside the process: the environment it reads, the
//! runner it starts processes through, and the config file chosen on the
//! command line.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use crate::config::{env_vars::process_env, ConfigResolver, FlagOverrides, Snapshot};
use crate::envfile::{EnvFile, ENV_BACKUP_NAME, ENV_FILE_NAME};
use crate::error::{Result, VulcanError};
use crate::shell::{in_container_at, CommandResult, CommandSpec, Runner, SystemRunner, DOCKERENV_MARKER};

/// Compose file for the development database.
pub const DEV_COMPOSE_FILE: &str = "docker-compose.dev.yml";

/// Foreman process file for development.
pub const PROCFILE_DEV: &str = "Procfile.dev";

/// Where `db snapshot` keeps its dumps, relative to the root.
pub const SNAPSHOT_DIR: &str = ".vulcan/snapshots";

/// Deployment flavour of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Compose file passed with `-f`, if the default one isn't used.
    pub fn compose_file(self) -> Option<&'static str> {
        match self {
            Self::Development => Some(DEV_COMPOSE_FILE),
            Self::Production => None,
        }
    }

    /// Database the dump and restore commands target.
    pub fn database_name(self) -> &'static str {
        match self {
            Self::Development => "vulcan_vue_development",
            Self::Production => "vulcan_postgres_production",
        }
    }

    /// Detect from `.env` content.
    pub fn from_env_content(content: &str) -> Self {
        if content.contains("RAILS_ENV=production") {
            Self::Production
        } else {
            Self::Development
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(VulcanError::validation(
                "Invalid environment. Use 'dev' or 'production'",
            )),
        }
    }
}

/// Context shared by every command.
pub struct Project {
    root: PathBuf,
    config_file: Option<PathBuf>,
    env: HashMap<String, String>,
    runner: Rc<dyn Runner>,
    container_marker: PathBuf,
}

impl Project {
    /// A project rooted at `root`, using the real environment and processes.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            config_file: None,
            env: process_env(),
            runner: Rc::new(SystemRunner),
            container_marker: PathBuf::from(DOCKERENV_MARKER),
        }
    }

    /// Replace the environment variables commands see.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_runner(mut self, runner: Rc<dyn Runner>) -> Self {
        self.runner = runner;
        self
    }

    /// Config file given with `--config`.
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Override the `/.dockerenv` location used for container detection.
    pub fn with_container_marker(mut self, path: PathBuf) -> Self {
        self.container_marker = path;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub fn runner(&self) -> &dyn Runner {
        self.runner.as_ref()
    }

    pub fn env_path(&self) -> PathBuf {
        self.root.join(ENV_FILE_NAME)
    }

    pub fn env_backup_path(&self) -> PathBuf {
        self.root.join(ENV_BACKUP_NAME)
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.root.join(SNAPSHOT_DIR)
    }

    /// Read `.env`, failing with the setup hint when it is missing.
    pub fn env_file(&self) -> Result<EnvFile> {
        EnvFile::parse(&self.env_path()).map_err(|e| match e {
            VulcanError::NotFound { .. } => {
                VulcanError::not_found("No .env file found. Run 'vulcan setup' first.")
            }
            other => other,
        })
    }

    /// Production when `.env` sets `RAILS_ENV=production`.
    pub fn environment(&self) -> Environment {
        match fs::read_to_string(self.env_path()) {
            Ok(content) => Environment::from_env_content(&content),
            Err(_) => Environment::Development,
        }
    }

    /// True inside a container (`/.dockerenv` or `BUNDLE_PATH`).
    pub fn in_container(&self) -> bool {
        in_container_at(&self.container_marker, &self.env)
    }

    /// A command with the project root as its working directory.
    pub fn command<I, S>(&self, program: &str, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(program, args).cwd(&self.root)
    }

    /// `docker compose [-f <file>] <args>` for `env`.
    pub fn compose<I, S>(&self, env: Environment, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = self.command("docker", ["compose"]);
        if let Some(file) = env.compose_file() {
            spec = spec.args(["-f", file]);
        }
        spec.args(args)
    }

    /// Rails outside containers: `bin/rails` when already inside one,
    /// otherwise `bundle exec rails`.
    pub fn local_rails<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.in_container() {
            self.command("bin/rails", args)
        } else {
            self.command("bundle", ["exec", "rails"]).args(args)
        }
    }

    /// Rails for the detected environment. Production goes through the
    /// `web` service.
    pub fn rails<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.environment() {
            Environment::Production => self
                .compose(Environment::Production, ["exec", "web", "bin/rails"])
                .args(args),
            Environment::Development => self.local_rails(args),
        }
    }

    /// Run a command through the project's runner.
    pub fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.runner.run(spec)
    }

    /// Run and require a zero exit.
    pub fn run_checked(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.run(spec)?.check(spec)
    }

    /// True if the command exits zero. Output is discarded.
    pub fn succeeds(&self, spec: &CommandSpec) -> bool {
        self.runner.succeeds(spec)
    }

    /// A resolver for this project with the given command-line overrides.
    pub fn resolver(&self, overrides: FlagOverrides) -> ConfigResolver {
        ConfigResolver::new(&self.root)
            .with_config_file(self.config_file.clone())
            .with_env_source(self.env.clone())
            .with_overrides(overrides)
    }

    /// Resolve settings. A malformed file is fatal only when it was named
    /// with `--config`; otherwise it is logged and the remaining layers apply.
    pub fn snapshot(&self, overrides: FlagOverrides) -> Result<Snapshot> {
        let resolution = self.resolver(overrides).resolve();
        match resolution.file_error {
            Some(err) if self.config_file.is_some() => Err(err),
            Some(err) => {
                tracing::warn!("{}", err);
                Ok(resolution.snapshot)
            }
            None => Ok(resolution.snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use tempfile::TempDir;

    fn project(temp: &TempDir) -> Project {
        Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(Rc::new(MockRunner::new()))
            .with_container_marker(temp.path().join("no-dockerenv"))
    }

    #[test]
    fn environment_defaults_to_development() {
        let temp = TempDir::new().unwrap();
        assert_eq!(project(&temp).environment(), Environment::Development);
    }

    #[test]
    fn rails_env_production_in_env_file_means_production() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "PORT=3000\nRAILS_ENV=production\n").unwrap();
        assert_eq!(project(&temp).environment(), Environment::Production);
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
        let err = "staging".parse::<Environment>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid environment. Use 'dev' or 'production'");
    }

    #[test]
    fn development_compose_uses_dev_file() {
        let temp = TempDir::new().unwrap();
        let spec = project(&temp).compose(Environment::Development, ["up", "-d"]);
        assert_eq!(spec.display(), "docker compose -f docker-compose.dev.yml up -d");
        assert_eq!(spec.cwd.as_deref(), Some(temp.path()));
    }

    #[test]
    fn production_compose_uses_default_file() {
        let temp = TempDir::new().unwrap();
        let spec = project(&temp).compose(Environment::Production, ["down"]);
        assert_eq!(spec.display(), "docker compose down");
    }

    #[test]
    fn rails_uses_bundle_exec_on_host() {
        let temp = TempDir::new().unwrap();
        let spec = project(&temp).rails(["db:migrate"]);
        assert_eq!(spec.display(), "bundle exec rails db:migrate");
    }

    #[test]
    fn rails_uses_bin_rails_with_bundle_path() {
        let temp = TempDir::new().unwrap();
        let env = HashMap::from([("BUNDLE_PATH".to_string(), "/bundle".to_string())]);
        let spec = project(&temp).with_env(env).rails(["db:seed"]);
        assert_eq!(spec.display(), "bin/rails db:seed");
    }

    #[test]
    fn rails_goes_through_web_service_in_production() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "RAILS_ENV=production\n").unwrap();
        let spec = project(&temp).rails(["db:migrate:status"]);
        assert_eq!(
            spec.display(),
            "docker compose exec web bin/rails db:migrate:status"
        );
    }

    #[test]
    fn missing_env_file_has_setup_hint() {
        let temp = TempDir::new().unwrap();
        let err = project(&temp).env_file().unwrap_err();
        assert_eq!(err.to_string(), "No .env file found. Run 'vulcan setup' first.");
    }

    #[test]
    fn snapshot_reads_injected_environment() {
        let temp = TempDir::new().unwrap();
        let env = HashMap::from([("PORT".to_string(), "8080".to_string())]);
        let snap = project(&temp)
            .with_env(env)
            .snapshot(FlagOverrides::default())
            .unwrap();
        assert_eq!(snap.settings().ports.web, 8080);
    }

    #[test]
    fn malformed_explicit_config_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yaml");
        fs::write(&path, "ports: [web: 1").unwrap();

        let result = project(&temp)
            .with_config_file(Some(path))
            .snapshot(FlagOverrides::default());
        assert!(matches!(result, Err(VulcanError::ConfigParse { .. })));
    }

    #[test]
    fn malformed_discovered_config_falls_back() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("vulcan.yaml"), "ports: [web: 1").unwrap();

        let snap = project(&temp).snapshot(FlagOverrides::default()).unwrap();
        assert_eq!(snap.settings().ports.web, 3000);
    }

    #[test]
    fn database_names_follow_environment() {
        assert_eq!(Environment::Production.database_name(), "vulcan_postgres_production");
        assert_eq!(Environment::Development.database_name(), "vulcan_vue_development");
    }
}
