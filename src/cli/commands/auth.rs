//! Auth command implementation.
//!
//! `vulcan auth` reports and edits the OIDC, LDAP, and local login keys in
//! `.env`. Setup flows start from an empty file when `.env` is missing.

use crate::auth::{
    discovery_url, LdapSetup, OidcSetup, Provider, ProviderPreset, LDAP_DEFAULT_FILTER,
    PROVIDER_PRESETS,
};
use crate::cli::args::{AuthArgs, AuthSubcommand};
use crate::envfile::EnvFile;
use crate::error::{Result, VulcanError};
use crate::project::Project;
use crate::secrets::mask_identifier;
use crate::ui::{self, PromptOption, UserInterface};

use super::dispatcher::{Command, CommandResult};

const RESTART_HINT: &str = "Restart Vulcan for changes to take effect";

fn enabled(env: &EnvFile, key: &str) -> bool {
    env.value(key) == "true"
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

/// The auth command implementation.
pub struct AuthCommand<'a> {
    project: &'a Project,
    args: AuthArgs,
}

impl<'a> AuthCommand<'a> {
    pub fn new(project: &'a Project, args: AuthArgs) -> Self {
        Self { project, args }
    }

    fn env_or_empty(&self) -> Result<EnvFile> {
        EnvFile::parse_or_empty(&self.project.env_path())
    }

    fn status(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = match self.project.env_file() {
            Ok(env) => env,
            Err(VulcanError::NotFound { what }) => {
                ui.error(&what);
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        ui.show_header("Authentication Status");

        ui.message("Local Authentication");
        let local = enabled(&env, "VULCAN_ENABLE_LOCAL_LOGIN");
        let registration = enabled(&env, "VULCAN_ENABLE_USER_REGISTRATION");
        ui.message(&format!("  ● Local login {}", on_off(local)));
        ui.message(&format!("  ● User registration {}", on_off(registration)));
        ui.message("");

        ui.message("OIDC / OAuth2");
        if enabled(&env, "VULCAN_ENABLE_OIDC") {
            ui.success("  OIDC enabled");
            ui.message(&format!("    Provider:  {}", env.value("VULCAN_OIDC_PROVIDER_TITLE")));
            ui.message(&format!("    Issuer:    {}", env.value("VULCAN_OIDC_ISSUER_URL")));
            ui.message(&format!(
                "    Client ID: {}",
                mask_identifier(env.value("VULCAN_OIDC_CLIENT_ID"))
            ));
        } else {
            ui.message("  ○ OIDC not configured");
            ui.show_hint("Run 'vulcan auth setup-oidc' to configure");
        }
        ui.message("");

        ui.message("LDAP / Active Directory");
        if enabled(&env, "VULCAN_ENABLE_LDAP") {
            let port = match env.value("VULCAN_LDAP_PORT") {
                "" => "389",
                p => p,
            };
            ui.success("  LDAP enabled");
            ui.message(&format!("    Server:  {}:{}", env.value("VULCAN_LDAP_HOST"), port));
            ui.message(&format!("    Base DN: {}", env.value("VULCAN_LDAP_BASE")));
        } else {
            ui.message("  ○ LDAP not configured");
            ui.show_hint("Run 'vulcan auth setup-ldap' to configure");
        }

        Ok(CommandResult::success())
    }

    fn setup_oidc(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("OIDC Configuration");

        let options = PROVIDER_PRESETS
            .iter()
            .map(|p| PromptOption::new(p.label(), p.name))
            .collect();
        let chosen = ui::select(ui, "oidc_provider", "Select your identity provider", options, None)?;
        let preset = ProviderPreset::find(&chosen)
            .ok_or_else(|| VulcanError::validation(format!("Unknown provider: {}", chosen)))?;

        let instructions = preset.instruction_lines();
        if !instructions.is_empty() {
            ui.message(&format!("{} Setup Instructions", preset.name));
            for line in &instructions {
                ui.message(&format!("  {}", line));
            }
            ui.message("");
        }

        let provider_title =
            ui::input(ui, "oidc_title", "Provider display name", Some(preset.name))?;
        ui.show_hint(&format!("Issuer URL looks like {}", preset.issuer_hint));
        let mut setup = OidcSetup {
            provider_title,
            issuer_url: ui::input(ui, "oidc_issuer", "Issuer URL", None)?,
            client_id: ui::input(ui, "oidc_client_id", "Client ID", None)?,
            client_secret: ui::password(ui, "oidc_client_secret", "Client Secret")?,
            app_url: ui::input(ui, "oidc_app_url", "Your Vulcan URL", None)?,
            enable_local_login: false,
        };
        if setup.provider_title.is_empty() {
            setup.provider_title = preset.name.to_string();
        }

        if !setup.is_complete() {
            ui.error("Issuer URL, Client ID, and Client Secret are required");
            return Ok(CommandResult::failure(1));
        }

        let redirect_uri = setup.redirect_uri();
        ui.message("Configuration Summary");
        ui.message(&format!("  Provider:      {}", setup.provider_title));
        ui.message(&format!("  Issuer:        {}", setup.issuer_url));
        ui.message(&format!("  Client ID:     {}", setup.client_id));
        ui.message("  Client Secret: (hidden)");
        ui.message(&format!("  Redirect URI:  {}", redirect_uri));
        ui.message("");

        setup.enable_local_login = ui::confirm(
            ui,
            "oidc_local_login",
            "Also allow local username/password login?",
            false,
        )?;
        if !ui::confirm(ui, "oidc_save", "Save OIDC configuration?", false)? {
            ui.message("Configuration cancelled");
            return Ok(CommandResult::success());
        }

        let mut env = self.env_or_empty()?;
        env.update(setup.env_updates());
        env.write(&self.project.env_path())?;
        tracing::info!("Saved OIDC configuration for {}", preset.name);

        ui.success("OIDC configuration saved!");
        ui.show_hint(RESTART_HINT);
        ui.message(&format!(
            "Make sure this redirect URI is configured in {}:",
            preset.name
        ));
        ui.message(&format!("  {}", redirect_uri));
        Ok(CommandResult::success())
    }

    fn setup_ldap(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("LDAP Configuration");

        let host = ui::input(ui, "ldap_host", "LDAP Server Hostname", None)?;
        let use_ssl = ui::confirm(ui, "ldap_ssl", "Use SSL/TLS?", true)?;
        let port = ui::input(
            ui,
            "ldap_port",
            "LDAP Port",
            Some(LdapSetup::default_port(use_ssl)),
        )?;
        let base = ui::input(ui, "ldap_base", "Base DN", None)?;
        let bind_dn = ui::input(ui, "ldap_bind_dn", "Bind DN", None)?;
        let bind_password = ui::password(ui, "ldap_bind_password", "Bind Password")?;
        let user_filter = ui::input(
            ui,
            "ldap_filter",
            "User Filter (optional)",
            Some(LDAP_DEFAULT_FILTER),
        )?;

        let mut setup = LdapSetup {
            host,
            use_ssl,
            port,
            base,
            bind_dn,
            bind_password,
            user_filter,
            enable_local_login: false,
        };
        if setup.port.is_empty() {
            setup.port = LdapSetup::default_port(use_ssl).to_string();
        }

        if !setup.is_complete() {
            ui.error("LDAP Host and Base DN are required");
            return Ok(CommandResult::failure(1));
        }

        ui.message("Configuration Summary");
        ui.message(&format!("  Server:  {}:{}", setup.host, setup.port));
        ui.message(&format!("  SSL/TLS: {}", setup.use_ssl));
        ui.message(&format!("  Base DN: {}", setup.base));
        ui.message(&format!("  Bind DN: {}", setup.bind_dn));
        ui.message(&format!("  Filter:  {}", setup.user_filter));
        ui.message("");

        setup.enable_local_login = ui::confirm(
            ui,
            "ldap_local_login",
            "Also allow local username/password login?",
            false,
        )?;
        if !ui::confirm(ui, "ldap_save", "Save LDAP configuration?", false)? {
            ui.message("Configuration cancelled");
            return Ok(CommandResult::success());
        }

        let mut env = self.env_or_empty()?;
        env.update(setup.env_updates());
        env.write(&self.project.env_path())?;
        tracing::info!("Saved LDAP configuration for {}", setup.host);

        ui.success("LDAP configuration saved!");
        ui.show_hint(RESTART_HINT);
        Ok(CommandResult::success())
    }

    fn test(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = match self.project.env_file() {
            Ok(env) => env,
            Err(VulcanError::NotFound { what }) => {
                ui.error(&what);
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        ui.show_header("Test Authentication");

        if enabled(&env, "VULCAN_ENABLE_OIDC") {
            ui.message("Testing OIDC...");
            let issuer = env.value("VULCAN_OIDC_ISSUER_URL");
            if issuer.is_empty() {
                ui.error("OIDC Issuer URL not configured");
            } else {
                ui.message(&format!("  Discovery URL: {}", discovery_url(issuer)));
                if issuer.starts_with("https://") {
                    ui.success("  Issuer URL uses HTTPS (good)");
                } else {
                    ui.warning("  Issuer URL uses HTTP (not recommended for production)");
                }
                report_presence(ui, &env, "VULCAN_OIDC_CLIENT_ID", "Client ID");
                report_presence(ui, &env, "VULCAN_OIDC_CLIENT_SECRET", "Client Secret");
            }
            ui.message("");
        }

        if enabled(&env, "VULCAN_ENABLE_LDAP") {
            ui.message("Testing LDAP...");
            let host = env.value("VULCAN_LDAP_HOST");
            if host.is_empty() {
                ui.error("LDAP Host not configured");
            } else {
                let port = match env.value("VULCAN_LDAP_PORT") {
                    "" => "389",
                    p => p,
                };
                ui.message(&format!("  LDAP Server: {}:{}", host, port));
                report_presence(ui, &env, "VULCAN_LDAP_BASE", "Base DN");
                if env.value("VULCAN_LDAP_BIND_DN").is_empty()
                    || env.value("VULCAN_LDAP_ADMIN_PASS").is_empty()
                {
                    ui.warning("  Bind credentials missing (may use anonymous bind)");
                } else {
                    ui.success("  Bind credentials configured");
                }
            }
            ui.message("");
        }

        ui.show_hint("For a full test, try logging in via the web interface");
        Ok(CommandResult::success())
    }

    fn disable(&self, ui: &mut dyn UserInterface, name: &str) -> Result<CommandResult> {
        let Some(provider) = Provider::parse(name) else {
            ui.error("Unknown provider. Use 'oidc' or 'ldap'");
            return Ok(CommandResult::failure(1));
        };

        let question = format!("Disable {} authentication?", provider.label());
        if !ui::confirm(ui, "auth_disable", &question, false)? {
            ui.message("Cancelled");
            return Ok(CommandResult::success());
        }

        let mut env = self.env_or_empty()?;
        env.update([(provider.enable_key(), "false")]);
        if let Err(e) = env.write(&self.project.env_path()) {
            ui.error(&format!("Failed to save: {}", e));
            return Ok(CommandResult::failure(1));
        }

        ui.success(&format!("{} authentication disabled", provider.label()));
        ui.show_hint(RESTART_HINT);
        Ok(CommandResult::success())
    }
}

fn report_presence(ui: &mut dyn UserInterface, env: &EnvFile, key: &str, label: &str) {
    if env.value(key).is_empty() {
        ui.error(&format!("  {} missing", label));
    } else {
        ui.success(&format!("  {} configured", label));
    }
}

impl Command for AuthCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            AuthSubcommand::Status => self.status(ui),
            AuthSubcommand::SetupOidc => self.setup_oidc(ui),
            AuthSubcommand::SetupLdap => self.setup_ldap(ui),
            AuthSubcommand::Test => self.test(ui),
            AuthSubcommand::Disable { provider } => self.disable(ui, provider),
        }
    }
}
