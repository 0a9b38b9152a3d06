//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and borrows the
//! [`Project`](crate::project::Project) it operates on. Routing from parsed
//! arguments happens in [`CommandDispatcher`].

pub mod auth;
pub mod build;
pub mod completions;
pub mod config;
pub mod db;
pub mod dispatcher;
pub mod logs;
pub mod setup;
pub mod start;
pub mod status;
pub mod stop;
pub mod test;
pub mod user;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
