//! Bounded network probes: local port checks and HTTP health endpoints.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::{Result, VulcanError};

/// How long a port connect may take before the port counts as free.
pub const PORT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Per-request timeout for health checks.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Ports probed for a running app, in order (foreman, then production).
pub const HEALTH_PORTS: &[u16] = &[5000, 3000];

/// Endpoints reported once a port answers.
pub const HEALTH_ENDPOINTS: &[(&str, &str)] = &[("Rails App", "/up"), ("Health Check", "/health_check")];

/// True if something accepts TCP connections on `127.0.0.1:port`.
pub fn is_port_in_use(port: u16) -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpStream::connect_timeout(&addr, PORT_PROBE_TIMEOUT).is_ok()
}

/// First free port in `start..start + 100`, or `start + 100` if all are taken.
pub fn suggest_alternative_port(start: u16) -> u16 {
    suggest_with(start, is_port_in_use)
}

/// [`suggest_alternative_port`] with a caller-supplied probe.
pub fn suggest_with(start: u16, in_use: impl Fn(u16) -> bool) -> u16 {
    let end = start.saturating_add(100);
    (start..end).find(|&p| !in_use(p)).unwrap_or(end)
}

/// Outcome of one endpoint check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointStatus {
    pub name: &'static str,
    pub path: &'static str,
    /// HTTP status, or None if the request failed.
    pub status: Option<u16>,
}

impl EndpointStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == Some(200)
    }
}

/// Result of probing the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// The port that answered, if any.
    pub port: Option<u16>,
    pub endpoints: Vec<EndpointStatus>,
}

/// Blocking health prober for the Rails app.
pub struct HealthProbe {
    host: String,
    client: reqwest::blocking::Client,
}

impl HealthProbe {
    pub fn new(host: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HEALTH_TIMEOUT)
            .build()
            .map_err(|e| VulcanError::Other(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            host: host.to_string(),
            client,
        })
    }

    fn url(&self, port: u16, path: &str) -> String {
        format!("http://{}:{}{}", self.host, port, path)
    }

    fn get_status(&self, port: u16, path: &str) -> Option<u16> {
        let url = self.url(port, path);
        match self.client.get(&url).send() {
            Ok(resp) => Some(resp.status().as_u16()),
            Err(e) => {
                tracing::debug!("Health probe {} failed: {}", url, e);
                None
            }
        }
    }

    /// Find the first port in `ports` where `/up` answers at all.
    pub fn find_port(&self, ports: &[u16]) -> Option<u16> {
        ports
            .iter()
            .copied()
            .find(|&p| self.get_status(p, "/up").is_some())
    }

    /// Probe `ports` and check each endpoint on the first that answers.
    pub fn check(&self, ports: &[u16]) -> HealthReport {
        let Some(port) = self.find_port(ports) else {
            return HealthReport {
                port: None,
                endpoints: Vec::new(),
            };
        };

        let endpoints = HEALTH_ENDPOINTS
            .iter()
            .map(|&(name, path)| EndpointStatus {
                name,
                path,
                status: self.get_status(port, path),
            })
            .collect();

        HealthReport {
            port: Some(port),
            endpoints,
        }
    }
}
