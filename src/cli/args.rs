//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::FlagOverrides;

/// Vulcan - Operator CLI for the Vulcan web application.
#[derive(Debug, Parser)]
#[command(name = "vulcan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides vulcan.{yaml,json,toml} discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the Vulcan checkout (overrides detection)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show and manage .env configuration
    Config(ConfigArgs),

    /// Configure authentication providers
    Auth(AuthArgs),

    /// First-time setup for development or production
    Setup(SetupArgs),

    /// Build Docker images with buildx bake
    Build(BuildArgs),

    /// Start Vulcan
    Start(StartArgs),

    /// Stop Vulcan
    Stop,

    /// Show container logs
    Logs(LogsArgs),

    /// Show runtime, container, and application health
    Status,

    /// Database operations
    Db(DbArgs),

    /// User administration
    User(UserArgs),

    /// Run the test suites
    Test(TestArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// The subcommand as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Setup(_) => "setup",
            Self::Build(_) => "build",
            Self::Start(_) => "start",
            Self::Stop => "stop",
            Self::Logs(_) => "logs",
            Self::Status => "status",
            Self::Db(_) => "db",
            Self::User(_) => "user",
            Self::Test(_) => "test",
            Self::Completions(_) => "completions",
        }
    }
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigSubcommand>,

    /// Reveal secrets when showing (no subcommand)
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the current .env (default)
    Show(ConfigShowArgs),

    /// Edit a setting interactively
    Edit,

    /// Regenerate secrets
    Rotate,

    /// Check .env for problems
    Validate,

    /// Write the resolved configuration to a file
    Write(ConfigWriteArgs),
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigShowArgs {
    /// Show secret values (dangerous)
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ConfigWriteArgs {
    /// Destination file
    pub path: PathBuf,

    /// Output format: yaml, json, or toml
    #[arg(long, default_value = "")]
    pub format: String,
}

/// Arguments for the `auth` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AuthSubcommand {
    /// Show configured providers
    Status,

    /// Configure an OIDC provider
    SetupOidc,

    /// Configure LDAP / Active Directory
    SetupLdap,

    /// Check provider settings
    Test,

    /// Turn a provider off
    Disable {
        /// oidc or ldap
        provider: String,
    },
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// dev, development, prod, or production
    pub environment: Option<String>,

    /// Show what would be done without doing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BuildArgs {
    #[command(subcommand)]
    pub command: Option<BuildSubcommand>,

    /// Target platforms (e.g., linux/amd64,linux/arm64)
    #[arg(short, long, default_value = "")]
    pub platform: String,

    /// Push to the registry after building
    #[arg(long)]
    pub push: bool,

    /// Bake target
    #[arg(short, long, default_value = crate::build::DEFAULT_TARGET)]
    pub target: String,

    /// Custom image tag (overrides version)
    #[arg(long)]
    pub tag: Option<String>,

    /// Build without cache
    #[arg(long)]
    pub no_cache: bool,

    /// Show build configuration instead of building
    #[arg(long)]
    pub info: bool,

    /// Ruby version
    #[arg(long)]
    pub ruby_version: Option<String>,

    /// Node.js version
    #[arg(long)]
    pub node_version: Option<String>,

    /// Image registry
    #[arg(long)]
    pub registry: Option<String>,

    /// Image name
    #[arg(long)]
    pub image: Option<String>,

    /// Image version tag
    #[arg(long)]
    pub version: Option<String>,

    /// Web port baked into the image
    #[arg(long)]
    pub port: Option<String>,

    /// Prometheus metrics port
    #[arg(long)]
    pub prometheus_port: Option<String>,
}

impl BuildArgs {
    /// Settings overrides from the version and port flags.
    pub fn overrides(&self) -> FlagOverrides {
        FlagOverrides {
            ruby_version: self.ruby_version.clone(),
            node_version: self.node_version.clone(),
            registry: self.registry.clone(),
            image: self.image.clone(),
            version: self.version.clone(),
            port: self.port.clone(),
            prometheus_port: self.prometheus_port.clone(),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum BuildSubcommand {
    /// Show build configuration
    Info,
}

/// Arguments for the `start` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StartArgs {
    /// Run in the background (production)
    #[arg(short, long)]
    pub daemon: bool,
}

/// Arguments for the `logs` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LogsArgs {
    /// Follow log output
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show
    #[arg(short = 'n', long = "tail", default_value_t = 100)]
    pub lines: usize,

    /// Only this service
    pub service: Option<String>,
}

/// Arguments for the `db` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DbSubcommand {
    /// Run pending migrations
    Migrate,

    /// Undo recent migrations
    Rollback {
        /// Number of migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },

    /// Load seed data
    Seed,

    /// Drop, recreate, and seed the database
    Reset,

    /// Create the database
    Create,

    /// Drop the database
    Drop,

    /// Show migration status
    Status,

    /// Open a database console
    Console,

    /// Dump the database to a file
    Backup {
        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Load a dump into the database
    Restore {
        /// Backup file ("-" for stdin)
        file: Option<String>,

        /// Backup file ("-" for stdin)
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file_flag: Option<String>,
    },

    /// Create, list, or restore local snapshots
    Snapshot(SnapshotArgs),
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct SnapshotArgs {
    /// Snapshot name (default: timestamp)
    pub name: Option<String>,

    /// List snapshots
    #[arg(long)]
    pub list: bool,

    /// Restore a snapshot by name, or "latest"
    #[arg(long, value_name = "NAME")]
    pub restore: Option<String>,
}

/// Arguments for the `user` command.
#[derive(Debug, Clone, clap::Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserSubcommand {
    /// List users
    List,

    /// Set a new password for a user
    ResetPassword {
        email: Option<String>,

        /// Use this password instead of prompting
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an administrator account
    CreateAdmin {
        email: Option<String>,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Use this password instead of generating one
        #[arg(long)]
        password: Option<String>,
    },

    /// Mark an account as confirmed
    Confirm { email: Option<String> },
}

/// Arguments for the `test` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TestArgs {
    /// backend (rspec, ruby) or frontend (vitest, js); both when omitted
    pub suite: Option<String>,

    /// Watch mode (frontend)
    #[arg(short, long)]
    pub watch: bool,

    /// Run RSpec serially
    #[arg(long)]
    pub no_parallel: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_config_shows() {
        let cli = Cli::parse_from(["vulcan", "config", "--show-secrets"]);
        match cli.command {
            Some(Commands::Config(args)) => {
                assert!(args.command.is_none());
                assert!(args.show_secrets);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn subcommand_names_match_the_command_line() {
        let cli = Cli::parse_from(["vulcan", "user", "list"]);
        assert_eq!(cli.command.as_ref().map(Commands::name), Some("user"));
        assert_eq!(Commands::Stop.name(), "stop");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vulcan", "status", "--debug", "--project", "/srv/vulcan"]);
        assert!(cli.debug);
        assert_eq!(cli.project, Some(PathBuf::from("/srv/vulcan")));
    }

    #[test]
    fn build_version_flag_is_an_override() {
        let cli = Cli::parse_from(["vulcan", "build", "--version", "v2.3.0", "-p", "linux/arm64"]);
        let Some(Commands::Build(args)) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.version.as_deref(), Some("v2.3.0"));
        assert_eq!(args.platform, "linux/arm64");
        assert_eq!(args.target, "production");
        assert_eq!(args.overrides().version.as_deref(), Some("v2.3.0"));
    }

    #[test]
    fn logs_defaults() {
        let cli = Cli::parse_from(["vulcan", "logs", "-f", "web"]);
        let Some(Commands::Logs(args)) = cli.command else {
            panic!("expected logs");
        };
        assert!(args.follow);
        assert_eq!(args.lines, 100);
        assert_eq!(args.service.as_deref(), Some("web"));
    }

    #[test]
    fn restore_accepts_flag_or_positional() {
        let cli = Cli::parse_from(["vulcan", "db", "restore", "-f", "dump.sql"]);
        let Some(Commands::Db(DbArgs {
            command: DbSubcommand::Restore { file, file_flag },
        })) = cli.command
        else {
            panic!("expected db restore");
        };
        assert!(file.is_none());
        assert_eq!(file_flag.as_deref(), Some("dump.sql"));
    }
}
