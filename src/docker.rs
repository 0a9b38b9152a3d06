//! Container runtime and container inspection for `vulcan status`.

use std::time::Duration;

use crate::error::{Result, VulcanError};
use crate::project::Project;
use crate::shell::CommandSpec;

/// Upper bound on `docker info`; a wedged daemon must not hang `status`.
pub const RUNTIME_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Containers from other projects shown under "Other containers".
pub const OTHER_CONTAINER_LIMIT: usize = 10;

const RELEVANT_NAMES: &[&str] = &["vulcan", "postgres", "redis"];

/// What `docker info` reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Friendly runtime name (OrbStack, Podman, ...).
    pub kind: String,
    pub operating_system: String,
    pub server_version: String,
}

/// Classify a runtime from `OperatingSystem` (or `Name`).
pub fn detect_runtime(operating_system: &str) -> &'static str {
    let os = operating_system.to_lowercase();
    if os.contains("orbstack") {
        "OrbStack"
    } else if os.contains("podman") {
        "Podman"
    } else if os.contains("rancher") {
        "Rancher Desktop"
    } else if os.contains("docker desktop") {
        "Docker Desktop"
    } else {
        "Docker"
    }
}

/// Parse `{{.OperatingSystem}}|{{.ServerVersion}}` output.
pub fn parse_runtime_info(output: &str) -> RuntimeInfo {
    let line = output.trim();
    let (os, version) = line.split_once('|').unwrap_or((line, ""));
    RuntimeInfo {
        kind: detect_runtime(os).to_string(),
        operating_system: os.trim().to_string(),
        server_version: version.trim().to_string(),
    }
}

/// Ask the daemon what it is. Errors carry the daemon's complaint.
pub fn runtime_info(project: &Project) -> Result<RuntimeInfo> {
    let spec = CommandSpec::new(
        "docker",
        ["info", "--format", "{{.OperatingSystem}}|{{.ServerVersion}}"],
    )
    .capture()
    .timeout(RUNTIME_PROBE_TIMEOUT);
    let result = project.run(&spec)?;
    if !result.success {
        let reason = if result.timed_out {
            "timed out".to_string()
        } else {
            result.stderr.trim().to_string()
        };
        return Err(VulcanError::Other(anyhow::anyhow!(reason)));
    }
    Ok(parse_runtime_info(&result.stdout))
}

/// One line of `docker ps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub name: String,
    pub image: String,
    pub status: String,
    pub ports: String,
}

impl ContainerInfo {
    /// Belongs to a Vulcan stack: name or image mentions vulcan, postgres,
    /// or redis.
    pub fn is_relevant(&self) -> bool {
        let name = self.name.to_lowercase();
        let image = self.image.to_lowercase();
        RELEVANT_NAMES
            .iter()
            .any(|n| name.contains(n) || image.contains(n))
    }

    pub fn is_running(&self) -> bool {
        self.status.starts_with("Up")
    }
}

/// Parse tab-separated `docker ps` output. Short lines are skipped.
pub fn parse_containers(output: &str) -> Vec<ContainerInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let name = fields.next()?.trim();
            let image = fields.next()?.trim();
            let status = fields.next()?.trim();
            let ports = fields.next().unwrap_or("").trim();
            if name.is_empty() {
                return None;
            }
            Some(ContainerInfo {
                name: name.to_string(),
                image: image.to_string(),
                status: status.to_string(),
                ports: ports.to_string(),
            })
        })
        .collect()
}

/// Split into (relevant, others), keeping order. Others are capped at
/// [`OTHER_CONTAINER_LIMIT`].
pub fn partition_containers(
    containers: Vec<ContainerInfo>,
) -> (Vec<ContainerInfo>, Vec<ContainerInfo>) {
    let (relevant, mut others): (Vec<_>, Vec<_>) =
        containers.into_iter().partition(ContainerInfo::is_relevant);
    others.truncate(OTHER_CONTAINER_LIMIT);
    (relevant, others)
}

/// Running containers.
pub fn list_containers(project: &Project) -> Result<Vec<ContainerInfo>> {
    let spec = CommandSpec::new(
        "docker",
        ["ps", "--format", "{{.Names}}\t{{.Image}}\t{{.Status}}\t{{.Ports}}"],
    )
    .capture();
    let result = project.run_checked(&spec)?;
    Ok(parse_containers(&result.stdout))
}

/// Name of the first running container whose name has both `vulcan` and
/// `web` in it.
pub fn find_web_container(project: &Project) -> Option<String> {
    let spec = CommandSpec::new("docker", ["ps", "--format", "{{.Names}}"]).capture();
    let result = project.run(&spec).ok().filter(|r| r.success)?;
    result
        .stdout
        .lines()
        .map(str::trim)
        .find(|name| name.contains("vulcan") && name.contains("web"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandResult, MockRunner};
    use std::collections::HashMap;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn project(temp: &TempDir, runner: &Rc<MockRunner>) -> Project {
        Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(runner.clone())
    }

    fn container(name: &str, image: &str) -> ContainerInfo {
        ContainerInfo {
            name: name.into(),
            image: image.into(),
            status: "Up 2 hours".into(),
            ports: String::new(),
        }
    }

    #[test]
    fn runtime_names() {
        assert_eq!(detect_runtime("OrbStack"), "OrbStack");
        assert_eq!(detect_runtime("podman"), "Podman");
        assert_eq!(detect_runtime("Rancher Desktop WSL Distribution"), "Rancher Desktop");
        assert_eq!(detect_runtime("Docker Desktop"), "Docker Desktop");
        assert_eq!(detect_runtime("Ubuntu 24.04 LTS"), "Docker");
    }

    #[test]
    fn parses_info_line() {
        let info = parse_runtime_info("Docker Desktop|27.3.1\n");
        assert_eq!(info.kind, "Docker Desktop");
        assert_eq!(info.server_version, "27.3.1");
    }

    #[test]
    fn runtime_probe_is_bounded() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        runner.respond("docker info", CommandResult::success("OrbStack|28.0.0"));
        let info = runtime_info(&project(&temp, &runner)).unwrap();

        assert_eq!(info.kind, "OrbStack");
        let spec = runner.find("docker info").unwrap();
        assert_eq!(spec.timeout, Some(RUNTIME_PROBE_TIMEOUT));
    }

    #[test]
    fn runtime_failure_is_an_error() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        runner.respond(
            "docker info",
            CommandResult::failure(Some(1), "Cannot connect to the Docker daemon"),
        );
        let err = runtime_info(&project(&temp, &runner)).unwrap_err();
        assert!(err.to_string().contains("Cannot connect"));
    }

    #[test]
    fn parses_ps_output() {
        let out = "vulcan-web-1\tmitre/vulcan:latest\tUp 3 minutes\t0.0.0.0:3000->3000/tcp\n\
                   vulcan-db-1\tpostgres:16\tExited (0) 1 hour ago\t\n\
                   garbage\n";
        let containers = parse_containers(out);
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].ports, "0.0.0.0:3000->3000/tcp");
        assert!(containers[0].is_running());
        assert!(!containers[1].is_running());
    }

    #[test]
    fn relevance_checks_name_and_image() {
        assert!(container("vulcan-web-1", "nginx").is_relevant());
        assert!(container("db", "postgres:16").is_relevant());
        assert!(container("cache", "redis:7").is_relevant());
        assert!(!container("grafana", "grafana/grafana").is_relevant());
    }

    #[test]
    fn others_are_capped() {
        let mut all = vec![container("vulcan-web-1", "mitre/vulcan")];
        for i in 0..15 {
            all.push(container(&format!("other-{}", i), "busybox"));
        }
        let (relevant, others) = partition_containers(all);
        assert_eq!(relevant.len(), 1);
        assert_eq!(others.len(), OTHER_CONTAINER_LIMIT);
        assert_eq!(others[0].name, "other-0");
    }

    #[test]
    fn finds_web_container() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        runner.respond(
            "docker ps",
            CommandResult::success("vulcan-db-1\nvulcan-web-1\n"),
        );
        assert_eq!(
            find_web_container(&project(&temp, &runner)).as_deref(),
            Some("vulcan-web-1")
        );
    }

    #[test]
    fn no_web_container_when_docker_fails() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        runner.fail("docker ps");
        assert!(find_web_container(&project(&temp, &runner)).is_none());
    }
}
