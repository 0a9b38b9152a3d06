//! Status command implementation.
//!
//! The `vulcan status` command reports the container runtime, the
//! containers it is running, and whether the Rails app answers its health
//! endpoints.

use crate::docker::{list_containers, partition_containers, runtime_info, ContainerInfo};
use crate::error::Result;
use crate::project::Project;
use crate::shell::{HealthProbe, HEALTH_PORTS};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

const HEALTH_HOST: &str = "127.0.0.1";

fn marker(ok: bool) -> &'static str {
    if ok {
        "●"
    } else {
        "○"
    }
}

/// The status command implementation.
pub struct StatusCommand<'a> {
    project: &'a Project,
    health_ports: Vec<u16>,
}

impl<'a> StatusCommand<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            health_ports: HEALTH_PORTS.to_vec(),
        }
    }

    /// Probe these ports for the app instead of the standard ones.
    pub fn with_health_ports(mut self, ports: Vec<u16>) -> Self {
        self.health_ports = ports;
        self
    }

    fn runtime(&self, ui: &mut dyn UserInterface) -> Result<()> {
        ui.message("Container Runtime");
        match runtime_info(self.project) {
            Ok(info) => {
                ui.success(&format!("  ● {} v{}", info.kind, info.server_version));
            }
            Err(e) => {
                ui.error(&format!("  ● Cannot connect to container runtime: {}", e));
                ui.show_hint("Install Docker Desktop, OrbStack, or Podman");
            }
        }
        ui.message("");
        Ok(())
    }

    fn container_line(c: &ContainerInfo, with_ports: bool) -> String {
        let mut line = format!("    {} {} ({})", marker(c.is_running()), c.name, c.image);
        if with_ports && !c.ports.is_empty() {
            line.push_str(&format!(" [{}]", c.ports));
        }
        line
    }

    fn containers(&self, ui: &mut dyn UserInterface) -> Result<()> {
        ui.message("Docker Containers");
        let containers = match list_containers(self.project) {
            Ok(list) => list,
            Err(e) => {
                tracing::debug!("Container listing failed: {}", e);
                ui.message("  Docker not accessible");
                ui.message("");
                return Ok(());
            }
        };
        if containers.is_empty() {
            ui.message("  No containers running");
            ui.message("");
            return Ok(());
        }

        let total = containers.len();
        let (relevant, others) = partition_containers(containers);
        let hidden = total - relevant.len() - others.len();

        if !relevant.is_empty() {
            ui.message("  Relevant:");
            for c in &relevant {
                ui.message(&Self::container_line(c, true));
            }
        }
        if !others.is_empty() {
            ui.message("  Other:");
            for c in &others {
                ui.message(&Self::container_line(c, false));
            }
            if hidden > 0 {
                ui.message(&format!("    → ... and {} more", hidden));
            }
        }
        ui.message("");
        Ok(())
    }

    fn health(&self, ui: &mut dyn UserInterface) -> Result<()> {
        ui.message("Health Checks");
        let report = HealthProbe::new(HEALTH_HOST)?.check(&self.health_ports);
        let Some(port) = report.port else {
            let ports: Vec<_> = self.health_ports.iter().map(u16::to_string).collect();
            ui.error(&format!(
                "  ● Rails App (not responding on ports {})",
                ports.join(" or ")
            ));
            ui.message("");
            return Ok(());
        };

        ui.message(&format!("  Port: {}", port));
        for endpoint in &report.endpoints {
            match endpoint.status {
                Some(_) if endpoint.is_healthy() => {
                    ui.success(&format!("  ● {}", endpoint.name));
                }
                Some(status) => {
                    ui.error(&format!("  ● {} (status: {})", endpoint.name, status));
                }
                None => ui.error(&format!("  ● {} (not responding)", endpoint.name)),
            }
        }
        ui.message("");
        Ok(())
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Vulcan Status");
        self.runtime(ui)?;
        self.containers(ui)?;
        self.health(ui)?;
        Ok(CommandResult::success())
    }
}
