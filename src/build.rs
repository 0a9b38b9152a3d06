//! `docker buildx bake` invocation for image builds.

use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Bake definition required at the project root.
pub const BAKE_FILE: &str = "docker-bake.hcl";

/// Builder created for multi-platform builds.
pub const BUILDER_NAME: &str = "vulcan-builder";

/// Platforms offered when pushing without `--platform`.
pub const MULTI_ARCH_PLATFORMS: &str = "linux/amd64,linux/arm64";

/// Default bake target.
pub const DEFAULT_TARGET: &str = "production";

/// One requested build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub target: String,
    /// Comma-separated platforms; empty leaves the bake file's choice.
    pub platforms: String,
    pub push: bool,
    pub no_cache: bool,
    /// Replaces the tags from the bake file.
    pub tag: Option<String>,
}

impl BuildPlan {
    pub fn is_multi_platform(&self) -> bool {
        self.platforms.contains(',')
    }

    /// Dockerfile this target builds from. Development targets use the
    /// plain `Dockerfile`.
    pub fn dockerfile(&self, root: &Path, settings: &Settings) -> PathBuf {
        match self.target.as_str() {
            "dev" | "development" => root.join("Dockerfile"),
            _ => root.join(&settings.docker.dockerfile),
        }
    }

    /// Arguments after `docker`.
    pub fn bake_args(&self) -> Vec<String> {
        let mut args = vec!["buildx".to_string(), "bake".to_string()];
        if !self.platforms.is_empty() {
            args.push("--set".into());
            args.push(format!("*.platform={}", self.platforms));
        }
        if self.push {
            args.push("--push".into());
        }
        if self.no_cache {
            args.push("--no-cache".into());
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            args.push("--set".into());
            args.push(format!("*.tags={}", tag));
        }
        args.push(self.target.clone());
        args
    }
}

/// Variables the bake file interpolates.
pub fn bake_env(settings: &Settings) -> Vec<(String, String)> {
    let build = &settings.build;
    let ports = &settings.ports;
    [
        ("RUBY_VERSION", build.ruby_version.clone()),
        ("NODE_VERSION", build.node_version.clone()),
        ("BUNDLER_VERSION", build.bundler_version.clone()),
        ("REGISTRY", build.registry.clone()),
        ("IMAGE_NAME", build.image.clone()),
        ("VERSION", build.version.clone()),
        ("WEB_PORT", ports.web.to_string()),
        ("PROMETHEUS_PORT", ports.prometheus.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(target: &str) -> BuildPlan {
        BuildPlan {
            target: target.into(),
            ..Default::default()
        }
    }

    #[test]
    fn plain_build_is_just_the_target() {
        assert_eq!(plan("production").bake_args(), vec!["buildx", "bake", "production"]);
    }

    #[test]
    fn all_flags_in_order() {
        let plan = BuildPlan {
            target: "production".into(),
            platforms: MULTI_ARCH_PLATFORMS.into(),
            push: true,
            no_cache: true,
            tag: Some("mitre/vulcan:v2.3.0".into()),
        };
        assert!(plan.is_multi_platform());
        assert_eq!(
            plan.bake_args(),
            vec![
                "buildx",
                "bake",
                "--set",
                "*.platform=linux/amd64,linux/arm64",
                "--push",
                "--no-cache",
                "--set",
                "*.tags=mitre/vulcan:v2.3.0",
                "production",
            ]
        );
    }

    #[test]
    fn dockerfile_depends_on_target() {
        let settings = Settings::default();
        let root = Path::new("/app");
        assert_eq!(
            plan("production").dockerfile(root, &settings),
            root.join("Dockerfile.production")
        );
        assert_eq!(plan("development").dockerfile(root, &settings), root.join("Dockerfile"));
    }

    #[test]
    fn env_carries_versions_and_ports() {
        let mut settings = Settings::default();
        settings.build.ruby_version = "3.4.7".into();
        settings.ports.prometheus = 9400;
        let env = bake_env(&settings);

        assert_eq!(env.len(), 8);
        assert!(env.contains(&("RUBY_VERSION".into(), "3.4.7".into())));
        assert!(env.contains(&("IMAGE_NAME".into(), "vulcan".into())));
        assert!(env.contains(&("PROMETHEUS_PORT".into(), "9400".into())));
    }
}
