//! Command-line interface for Vulcan.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    AuthArgs, BuildArgs, Cli, Commands, CompletionsArgs, ConfigArgs, DbArgs, LogsArgs, SetupArgs,
    StartArgs, TestArgs, UserArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
