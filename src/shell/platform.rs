//! Host environment detection.

use std::collections::HashMap;
use std::path::Path;

const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`.
pub fn is_ci() -> bool {
    CI_VARS.iter().any(|v| std::env::var_os(v).is_some())
}

/// True when running inside a container: `/.dockerenv` exists or
/// `BUNDLE_PATH` is set.
pub fn in_container(env: &HashMap<String, String>) -> bool {
    in_container_at(Path::new(DOCKERENV_MARKER), env)
}

/// Marker file Docker creates at the container root.
pub const DOCKERENV_MARKER: &str = "/.dockerenv";

/// [`in_container`] with an explicit marker path.
pub fn in_container_at(marker: &Path, env: &HashMap<String, String>) -> bool {
    marker.exists() || env.get("BUNDLE_PATH").is_some_and(|v| !v.is_empty())
}
