//! External processes and host probes.

pub mod command;
pub mod mock;
pub mod platform;
pub mod probe;

pub use command::{
    execute, CommandResult, CommandSpec, Runner, StdinSource, StdoutTarget, SystemRunner,
};
pub use mock::MockRunner;
pub use platform::{in_container, in_container_at, is_ci, DOCKERENV_MARKER};
pub use probe::{
    is_port_in_use, suggest_alternative_port, suggest_with, HealthProbe, HealthReport, HEALTH_PORTS,
};
