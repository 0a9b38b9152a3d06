//! Setup command implementation.

use crate::cli::args::SetupArgs;
use crate::envfile::EnvFile;
use crate::error::{Result, VulcanError};
use crate::project::{Environment, Project, PROCFILE_DEV};
use crate::setup::{
    oidc_redirect_uri, render_env_file, AuthMethod, SetupConfig, SetupStep, SmtpConfig,
    DEV_STEPS, PREREQUISITES,
};
use crate::shell::{is_port_in_use, suggest_with};
use crate::ui::{self, PromptOption, UserInterface};

use super::dispatcher::{Command, CommandResult};

fn parse_port(value: &str, fallback: u16) -> Result<u16> {
    if value.is_empty() {
        return Ok(fallback);
    }
    value
        .parse()
        .map_err(|_| VulcanError::validation(format!("Invalid port: {}", value)))
}

/// The setup command implementation.
pub struct SetupCommand<'a> {
    project: &'a Project,
    args: SetupArgs,
    port_in_use: fn(u16) -> bool,
}

impl<'a> SetupCommand<'a> {
    pub fn new(project: &'a Project, args: SetupArgs) -> Self {
        Self {
            project,
            args,
            port_in_use: is_port_in_use,
        }
    }

    /// Replace the local port probe.
    pub fn with_port_probe(mut self, probe: fn(u16) -> bool) -> Self {
        self.port_in_use = probe;
        self
    }

    fn choose_environment(&self, ui: &mut dyn UserInterface) -> Result<Environment> {
        if let Some(value) = &self.args.environment {
            return value.parse();
        }
        let answer = ui::select(
            ui,
            "environment",
            "Select environment",
            vec![
                PromptOption::new("Development (local machine)", "development"),
                PromptOption::new("Production (Docker deployment)", "production"),
            ],
            None,
        )?;
        answer.parse()
    }

    /// Ask for a replacement when `port` is taken.
    fn free_port(
        &self,
        ui: &mut dyn UserInterface,
        key: &str,
        label: &str,
        service: &str,
        port: u16,
    ) -> Result<u16> {
        if !(self.port_in_use)(port) {
            return Ok(port);
        }
        let alternative = suggest_with(port, self.port_in_use);
        ui.error(&format!("Port {} is in use ({})", port, service));
        ui.message(&format!("Suggested alternative: {}", alternative));
        let answer = ui::input(ui, key, label, Some(&alternative.to_string()))?;
        parse_port(&answer, alternative)
    }

    /// Ask before replacing an existing `.env`. Returns whether to write.
    fn may_write_env(&self, ui: &mut dyn UserInterface) -> Result<bool> {
        if !self.project.env_path().exists() {
            return Ok(true);
        }
        let overwrite = ui::confirm(
            ui,
            "overwrite_env",
            ".env file already exists. Overwrite it?",
            false,
        )?;
        if !overwrite {
            ui.message("Keeping existing .env file");
        }
        Ok(overwrite)
    }

    fn write_env(&self, config: &SetupConfig) -> Result<()> {
        let path = self.project.env_path();
        EnvFile::parse_str(&render_env_file(config)).write(&path)?;
        tracing::info!("Wrote {} configuration to {}", config.environment, path.display());
        Ok(())
    }

    fn check_prerequisites(&self, ui: &mut dyn UserInterface) -> bool {
        ui.message("Checking prerequisites...");
        for check in PREREQUISITES {
            if !self.project.succeeds(&check.spec(self.project)) {
                ui.error(&format!("{} not found. Please install it first.", check.title));
                return false;
            }
            ui.success(&format!("{} found", check.title));
        }
        true
    }

    fn run_step(&self, ui: &mut dyn UserInterface, step: &SetupStep) -> Result<bool> {
        let spec = step.spec(self.project);
        if ui.output_mode().shows_command_output() {
            ui.message(&format!("→ {}", step.title));
            let result = self.project.run(&spec)?;
            if !result.success {
                ui.error(&format!("Failed: {}", step.title));
            }
            return Ok(result.success);
        }

        let mut spinner = ui.start_spinner(step.title);
        let result = self.project.run(&spec.capture())?;
        if result.success {
            spinner.finish_success(step.done_title());
            return Ok(true);
        }
        spinner.finish_error(step.done_title());
        ui.error(&format!("Failed: {}", step.title));
        let stderr = result.stderr.trim();
        if !stderr.is_empty() {
            ui.error(stderr);
        }
        Ok(false)
    }

    fn development(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dry_run = self.args.dry_run;
        ui.show_header("Development Setup");
        if dry_run {
            ui.message("[DRY RUN] Showing what would be done...");
        } else {
            ui.message("Setting up Vulcan for local development...");
        }

        let mut config = SetupConfig::development();
        config.web_port = self.free_port(
            ui,
            "web_port",
            "Web server port",
            "Rails server",
            config.web_port,
        )?;
        config.database_port = self.free_port(
            ui,
            "database_port",
            "Database port",
            "PostgreSQL",
            config.database_port,
        )?;
        config.app_url = format!("http://localhost:{}", config.web_port);

        if ui::confirm(ui, "configure_oidc", "Configure OIDC authentication?", false)? {
            config.auth_method = AuthMethod::Oidc;
            config.oidc.provider_title =
                ui::input(ui, "oidc_title", "OIDC Provider Name", Some("Okta"))?;
            config.oidc.issuer_url = ui::input(ui, "oidc_issuer", "OIDC Issuer URL", None)?;
            config.oidc.client_id = ui::input(ui, "oidc_client_id", "Client ID", None)?;
            config.oidc.client_secret = ui::password(ui, "oidc_client_secret", "Client Secret")?;
            config.oidc.redirect_uri = oidc_redirect_uri(&config.app_url);
        }

        if !self.check_prerequisites(ui) {
            return Ok(CommandResult::failure(1));
        }

        if dry_run {
            ui.message("[DRY RUN] Would create .env file");
            ui.message("  Environment variables:");
            ui.message(&format!("    PORT={}", config.web_port));
            ui.message(&format!("    DATABASE_PORT={}", config.database_port));
            ui.message("    POSTGRES_PASSWORD=postgres");
            ui.message("    SECRET_KEY_BASE=development_secret_...");
            ui.message("    CIPHER_PASSWORD=development_cipher_...");
            ui.message("    VULCAN_ENABLE_LOCAL_LOGIN=true");
            ui.message(&format!("    VULCAN_APP_URL={}", config.app_url));
            if config.auth_method == AuthMethod::Oidc {
                ui.message("    VULCAN_ENABLE_OIDC=true");
                ui.message(&format!("    VULCAN_OIDC_ISSUER_URL={}", config.oidc.issuer_url));
            }

            ui.message("[DRY RUN] Would execute:");
            for (i, step) in DEV_STEPS.iter().enumerate() {
                ui.message(&format!("  {}. {}", i + 1, step.done_title()));
                ui.message(&format!("     $ {}", step.command_line()));
            }

            ui.success("[DRY RUN] Setup Preview Complete");
            ui.show_hint("To run setup for real: vulcan setup dev");
            return Ok(CommandResult::success());
        }

        if self.may_write_env(ui)? {
            self.write_env(&config)?;
        }

        for step in DEV_STEPS {
            if !self.run_step(ui, step)? {
                return Ok(CommandResult::failure(1));
            }
        }

        ui.success("Setup Complete!");
        ui.message(&format!("Start Vulcan: vulcan start (or foreman start -f {})", PROCFILE_DEV));
        ui.message(&format!("Access Vulcan: {}", config.app_url));
        ui.message("Default login: admin@example.com / 1234567ab!");

        if ui::confirm(ui, "start_now", "Start Vulcan now?", false)? {
            ui.message("Starting Vulcan...");
            let foreman = self.project.command("foreman", ["start", "-f", PROCFILE_DEV]);
            let result = self.project.run(&foreman)?;
            if !result.success {
                return Ok(CommandResult::failure(result.exit_code.unwrap_or(1)));
            }
        }

        Ok(CommandResult::success())
    }

    fn production(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dry_run = self.args.dry_run;
        ui.show_header("Production Setup");
        if dry_run {
            ui.message("[DRY RUN] Showing production setup wizard...");
        } else {
            ui.message("Configuring Vulcan for production deployment...");
        }

        let (mut config, fallbacks) = SetupConfig::production();
        for name in fallbacks {
            ui.warning(&format!(
                "Could not generate a secure {}; replace the placeholder before deploying",
                name
            ));
        }

        ui.message("Port Configuration");
        let web = ui::input(ui, "web_port", "Web server port", Some("3000"))?;
        config.web_port = parse_port(&web, 3000)?;
        let db = ui::input(ui, "database_port", "Database port", Some("5432"))?;
        config.database_port = parse_port(&db, 5432)?;

        let method = ui::select(
            ui,
            "auth_method",
            "Primary authentication method",
            vec![
                PromptOption::new("OIDC/OAuth2 (Okta, Auth0, Azure AD, etc.)", "oidc"),
                PromptOption::new("LDAP/Active Directory", "ldap"),
                PromptOption::new("Local accounts only", "local"),
            ],
            None,
        )?;
        config.auth_method = method.parse()?;
        config.enable_local_auth =
            ui::confirm(ui, "enable_local_login", "Also enable local login?", false)?;

        match config.auth_method {
            AuthMethod::Oidc => {
                config.oidc.provider_title = ui::input(
                    ui,
                    "oidc_title",
                    "OIDC Provider Name",
                    Some("Your Organization"),
                )?;
                config.oidc.issuer_url = ui::input(ui, "oidc_issuer", "OIDC Issuer URL", None)?;
                config.oidc.client_id = ui::input(ui, "oidc_client_id", "Client ID", None)?;
                config.oidc.client_secret =
                    ui::password(ui, "oidc_client_secret", "Client Secret")?;
            }
            AuthMethod::Ldap => {
                config.ldap.host = ui::input(ui, "ldap_host", "LDAP Host", None)?;
                config.ldap.port = ui::input(ui, "ldap_port", "LDAP Port", Some("636"))?;
                config.ldap.base = ui::input(ui, "ldap_base", "LDAP Base DN", None)?;
                config.ldap.bind_dn = ui::input(ui, "ldap_bind_dn", "Bind DN", None)?;
                config.ldap.password = ui::password(ui, "ldap_bind_password", "Bind Password")?;
            }
            AuthMethod::Local | AuthMethod::None => {}
        }

        config.app_url = ui::input(ui, "app_url", "Application URL", None)?;
        config.contact_email = ui::input(ui, "contact_email", "Contact Email", None)?;
        config.welcome_text =
            ui::input(ui, "welcome_text", "Welcome Message", Some("Welcome to Vulcan"))?;
        config.oidc.redirect_uri = oidc_redirect_uri(&config.app_url);

        if ui::confirm(ui, "configure_smtp", "Configure email (SMTP)?", false)? {
            config.smtp = Some(SmtpConfig {
                address: ui::input(ui, "smtp_address", "SMTP Server", None)?,
                port: ui::input(ui, "smtp_port", "SMTP Port", Some("587"))?,
                username: ui::input(ui, "smtp_username", "SMTP Username", None)?,
                password: ui::password(ui, "smtp_password", "SMTP Password")?,
            });
        }

        if dry_run {
            ui.message(&format!(
                "[DRY RUN] Would create .env file at: {}",
                self.project.env_path().display()
            ));
            ui.message("[DRY RUN] Configuration summary:");
            ui.message(&format!("  Auth Method: {}", config.auth_method));
            ui.message(&format!("  Local Login: {}", config.enable_local_auth));
            match config.auth_method {
                AuthMethod::Oidc => {
                    ui.message(&format!("  OIDC Provider: {}", config.oidc.provider_title));
                    ui.message(&format!("  OIDC Issuer: {}", config.oidc.issuer_url));
                }
                AuthMethod::Ldap => ui.message(&format!("  LDAP Host: {}", config.ldap.host)),
                _ => {}
            }
            ui.message(&format!("  App URL: {}", config.app_url));
            ui.message(&format!("  Contact Email: {}", config.contact_email));
            ui.message(&format!("  SMTP Enabled: {}", config.smtp.is_some()));
            ui.success("[DRY RUN] Production Setup Preview Complete");
            ui.show_hint("To run setup for real: vulcan setup production");
            return Ok(CommandResult::success());
        }

        if !self.may_write_env(ui)? {
            return Ok(CommandResult::success());
        }
        self.write_env(&config)?;

        ui.success("Production Configuration Complete!");
        ui.message("Configuration saved to .env");
        ui.message("Next steps:");
        ui.message("  1. Review .env and adjust as needed");
        ui.message("  2. Start with: docker compose up -d");
        ui.message("  3. Initialize DB: docker compose exec web bin/rails db:prepare");
        ui.message(&format!("  4. Access at: {}", config.app_url));
        Ok(CommandResult::success())
    }
}

impl Command for SetupCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.choose_environment(ui)? {
            Environment::Development => self.development(ui),
            Environment::Production => self.production(ui),
        }
    }
}
