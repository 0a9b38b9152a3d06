//! Build command implementation.
//!
//! `vulcan build` drives `docker buildx bake` with versions and ports from
//! the resolved settings; `vulcan build info` shows what would be used.

use crate::build::{bake_env, BuildPlan, BAKE_FILE, BUILDER_NAME, MULTI_ARCH_PLATFORMS};
use crate::cli::args::{BuildArgs, BuildSubcommand};
use crate::config::{Settings, Snapshot};
use crate::error::Result;
use crate::project::Project;
use crate::ui::{self, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The build command implementation.
pub struct BuildCommand<'a> {
    project: &'a Project,
    args: BuildArgs,
}

impl<'a> BuildCommand<'a> {
    pub fn new(project: &'a Project, args: BuildArgs) -> Self {
        Self { project, args }
    }

    fn plan(&self) -> BuildPlan {
        BuildPlan {
            target: self.args.target.clone(),
            platforms: self.args.platform.clone(),
            push: self.args.push,
            no_cache: self.args.no_cache,
            tag: self.args.tag.clone(),
        }
    }

    /// Bake variables plus any `docker.build_args`.
    fn build_env(settings: &Settings) -> Vec<(String, String)> {
        let mut env = bake_env(settings);
        env.extend(
            settings
                .docker
                .build_args
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        env
    }

    fn sourced(snapshot: &Snapshot, path: &str, value: impl std::fmt::Display) -> String {
        match snapshot.source_of(path) {
            Some(source) => format!("{} (from {})", value, source),
            None => value.to_string(),
        }
    }

    fn info(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let snapshot = self.project.snapshot(self.args.overrides())?;
        let settings = snapshot.settings();
        let build = &settings.build;
        let ports = &settings.ports;

        ui.show_header("Build Configuration");
        if let Some(path) = snapshot.config_file() {
            ui.message(&format!("Config file: {}", path.display()));
            ui.message("");
        }

        let line = |label: &str, path: &str, value: &dyn std::fmt::Display| {
            format!("  {:<17}{}", label, Self::sourced(&snapshot, path, value))
        };

        ui.message("Version Information:");
        ui.message(&line("Ruby Version:", "build.ruby_version", &build.ruby_version));
        ui.message(&line("Node Version:", "build.node_version", &build.node_version));
        ui.message(&line("Bundler Version:", "build.bundler_version", &build.bundler_version));
        ui.message("");

        ui.message("Image Configuration:");
        ui.message(&line("Registry:", "build.registry", &build.registry));
        ui.message(&line("Image Name:", "build.image", &build.image));
        ui.message(&line("Version Tag:", "build.version", &build.version));
        ui.message(&format!("  {:<17}{}", "Full Image:", build.image_ref()));
        ui.message(&format!(
            "  {:<17}{}",
            "Platforms:",
            settings.docker.platforms.join(",")
        ));
        ui.message("");

        ui.message("Port Configuration:");
        ui.message(&line("Web Port:", "ports.web", &ports.web));
        ui.message(&line("Prometheus Port:", "ports.prometheus", &ports.prometheus));
        ui.message(&line("Database Port:", "ports.database", &ports.database));
        ui.message("");

        ui.message("Docker Bake Configuration:");
        let print = self
            .project
            .command("docker", ["buildx", "bake", "--print", self.args.target.as_str()])
            .envs(Self::build_env(settings));
        let result = self.project.run(&print)?;
        if !result.success {
            ui.warning("Could not print the bake configuration");
        }
        Ok(CommandResult::success())
    }

    fn ensure_builder(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let inspect = self
            .project
            .command("docker", ["buildx", "inspect", BUILDER_NAME]);
        let spec = if self.project.succeeds(&inspect) {
            self.project.command("docker", ["buildx", "use", BUILDER_NAME])
        } else {
            ui.message("Creating multi-platform builder...");
            self.project.command(
                "docker",
                [
                    "buildx",
                    "create",
                    "--name",
                    BUILDER_NAME,
                    "--driver",
                    "docker-container",
                    "--bootstrap",
                    "--use",
                ],
            )
        };
        let result = self.project.run(&spec)?;
        if !result.success {
            ui.warning(&format!("Could not select builder {}", BUILDER_NAME));
        }
        Ok(())
    }

    fn build(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let snapshot = self.project.snapshot(self.args.overrides())?;
        let settings = snapshot.settings();
        let root = self.project.root();
        let mut plan = self.plan();

        ui.show_header("Building Vulcan Docker Image");

        if !root.join(BAKE_FILE).is_file() {
            ui.error("docker-bake.hcl not found. Please ensure it exists in the project root.");
            return Ok(CommandResult::failure(1));
        }
        let dockerfile = plan.dockerfile(root, settings);
        if !dockerfile.is_file() {
            ui.error(&format!("Dockerfile not found: {}", dockerfile.display()));
            return Ok(CommandResult::failure(1));
        }

        if plan.push && plan.platforms.is_empty() {
            let question = format!("Build for multiple architectures ({})?", MULTI_ARCH_PLATFORMS);
            if ui::confirm(ui, "multi_arch", &question, false)? {
                plan.platforms = MULTI_ARCH_PLATFORMS.to_string();
            }
        }

        let image = settings.build.image_ref();
        ui.message("Build Configuration:");
        ui.message(&format!("  Target:     {}", plan.target));
        ui.message(&format!("  Image:      {}", image));
        ui.message(&format!("  Ruby:       {}", settings.build.ruby_version));
        ui.message(&format!("  Node:       {}", settings.build.node_version));
        if !plan.platforms.is_empty() {
            ui.message(&format!("  Platforms:  {}", plan.platforms));
        }
        if plan.push {
            ui.message("  Push:       enabled");
        }
        ui.message("");

        if !self
            .project
            .succeeds(&self.project.command("docker", ["buildx", "version"]))
        {
            ui.error("Docker Buildx not available. Please install Docker Buildx.");
            return Ok(CommandResult::failure(1));
        }

        if plan.is_multi_platform() {
            self.ensure_builder(ui)?;
        }

        ui.message("Building image...");
        let bake = self
            .project
            .command("docker", plan.bake_args())
            .envs(Self::build_env(settings));
        let result = self.project.run(&bake)?;
        if !result.success {
            let code = result.exit_code.unwrap_or(1);
            ui.error(&format!("Build failed: exit status {}", code));
            return Ok(CommandResult::failure(code));
        }

        tracing::info!("Built {} for target {}", image, plan.target);
        ui.success("Build complete!");
        ui.message(&format!("  Image: {}", image));
        if !plan.push {
            ui.message("Image available locally. Use --push to push to registry.");
        }
        Ok(CommandResult::success())
    }
}

impl Command for BuildCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match (&self.args.command, self.args.info) {
            (Some(BuildSubcommand::Info), _) | (None, true) => self.info(ui),
            (None, false) => self.build(ui),
        }
    }
}
