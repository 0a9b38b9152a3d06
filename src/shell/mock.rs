//! Recording runner for tests.
//!
//! # Example
//!
//! ```
//! use vulcan::shell::{CommandResult, CommandSpec, MockRunner, Runner};
//!
//! let runner = MockRunner::new();
//! runner.respond("docker info", CommandResult::success("Docker Desktop|27.0.1"));
//!
//! let out = runner.run(&CommandSpec::new("docker", ["info", "--format", "x"])).unwrap();
//! assert_eq!(out.stdout, "Docker Desktop|27.0.1");
//! assert!(runner.ran("docker info"));
//! ```

use std::cell::RefCell;

use crate::error::Result;

use super::command::{CommandResult, CommandSpec, Runner};

/// A [`Runner`] that records every command and replies from canned results.
///
/// Responses are matched by command-line prefix; the longest matching
/// prefix wins. Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: RefCell<Vec<CommandSpec>>,
    responses: RefCell<Vec<(String, CommandResult)>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `result` for commands whose command line starts with `prefix`.
    pub fn respond(&self, prefix: &str, result: CommandResult) {
        self.responses
            .borrow_mut()
            .push((prefix.to_string(), result));
    }

    /// Make every command starting with `prefix` exit 1.
    pub fn fail(&self, prefix: &str) {
        self.respond(prefix, CommandResult::failure(Some(1), ""));
    }

    /// All commands run so far.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Command lines run so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::command_line).collect()
    }

    /// True if some command line started with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.command_lines().iter().any(|c| c.starts_with(prefix))
    }

    /// The first recorded command starting with `prefix`.
    pub fn find(&self, prefix: &str) -> Option<CommandSpec> {
        self.calls
            .borrow()
            .iter()
            .find(|c| c.command_line().starts_with(prefix))
            .cloned()
    }
}

impl Runner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.command_line();
        let responses = self.responses.borrow();
        let reply = responses
            .iter()
            .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| CommandResult::success(""));
        Ok(reply)
    }
}
