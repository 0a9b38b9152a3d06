//! Config command implementation.
//!
//! `vulcan config` shows, edits, rotates, validates, and exports the
//! project's configuration. Everything except `write` works on the `.env`
//! file directly; `write` serializes the resolved settings snapshot.

use crate::cli::args::{ConfigArgs, ConfigSubcommand, ConfigWriteArgs};
use crate::config::{write_config, FlagOverrides};
use crate::envfile::{group_entries, EnvFile};
use crate::error::{Result, VulcanError};
use crate::fsutil;
use crate::project::Project;
use crate::secrets::{generate_secure_token, mask_value};
use crate::setup::config::{
    CIPHER_PASSWORD_BYTES, CIPHER_SALT_BYTES, POSTGRES_PASSWORD_BYTES, SECRET_KEY_BASE_BYTES,
};
use crate::ui::{self, PromptOption, UserInterface};
use crate::validate::validate_env;

use super::dispatcher::{Command, CommandResult};

/// Secrets `config rotate` can regenerate, with their byte lengths.
pub const ROTATABLE_SECRETS: &[(&str, usize)] = &[
    ("POSTGRES_PASSWORD", POSTGRES_PASSWORD_BYTES),
    ("SECRET_KEY_BASE", SECRET_KEY_BASE_BYTES),
    ("CIPHER_PASSWORD", CIPHER_PASSWORD_BYTES),
    ("CIPHER_SALT", CIPHER_SALT_BYTES),
];

fn rotation_warning(key: &str) -> Option<&'static str> {
    match key {
        "POSTGRES_PASSWORD" => Some("You'll need to update the database user password"),
        "SECRET_KEY_BASE" => Some("All sessions will be invalidated"),
        "CIPHER_PASSWORD" | "CIPHER_SALT" => Some("Encrypted data will become unreadable"),
        _ => None,
    }
}

/// The config command implementation.
pub struct ConfigCommand<'a> {
    project: &'a Project,
    args: ConfigArgs,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(project: &'a Project, args: ConfigArgs) -> Self {
        Self { project, args }
    }

    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }

    /// Load `.env` or report the setup hint. `None` means the caller
    /// should exit 1.
    fn load_env(&self, ui: &mut dyn UserInterface) -> Result<Option<EnvFile>> {
        match self.project.env_file() {
            Ok(env) => Ok(Some(env)),
            Err(VulcanError::NotFound { what }) => {
                ui.error(&what);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn show(&self, ui: &mut dyn UserInterface, show_secrets: bool) -> Result<CommandResult> {
        let Some(env) = self.load_env(ui)? else {
            return Ok(CommandResult::failure(1));
        };

        ui.show_header("Vulcan Configuration");

        for entry in env.entries() {
            if entry.is_comment {
                if entry.is_section_header() {
                    ui.message("");
                    ui.message(entry.raw.trim());
                } else if !entry.raw.trim().is_empty() {
                    ui.message(entry.raw.trim());
                }
                continue;
            }

            let value = if entry.is_secret && !show_secrets {
                mask_value(&entry.value)
            } else {
                entry.value.clone()
            };
            ui.message(&format!("  {} = {}", entry.key, value));
        }

        ui.message("");
        if show_secrets {
            ui.warning("WARNING: Secrets are visible!");
        } else {
            ui.show_hint("Secrets are masked. Use --show-secrets to reveal (dangerous)");
        }

        Ok(CommandResult::success())
    }

    fn edit(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(mut env) = self.load_env(ui)? else {
            return Ok(CommandResult::failure(1));
        };

        ui.show_header("Edit Configuration");

        let groups = group_entries(env.entries());
        if groups.is_empty() {
            ui.error("No editable settings found");
            return Ok(CommandResult::failure(1));
        }

        let category_options = groups
            .iter()
            .map(|(cat, idx)| {
                PromptOption::new(format!("{} ({} settings)", cat, idx.len()), cat.label())
            })
            .collect();
        let chosen =
            ui::select(ui, "edit_category", "Select category to edit", category_options, None)?;
        let Some((_, indices)) = groups.iter().find(|(cat, _)| cat.label() == chosen) else {
            return Err(VulcanError::validation(format!("Unknown category: {}", chosen)));
        };

        let setting_options = indices
            .iter()
            .map(|&i| {
                let entry = &env.entries()[i];
                let label = if entry.is_secret {
                    format!("{} (secret)", entry.key)
                } else {
                    entry.key.clone()
                };
                PromptOption::new(label, entry.key.clone())
            })
            .collect();
        let key = ui::select(ui, "edit_setting", "Select setting to edit", setting_options, None)?;

        let Some(entry) = env.entries().iter().find(|e| !e.is_comment && e.key == key) else {
            return Err(VulcanError::not_found(format!("Setting not found: {}", key)));
        };
        let is_secret = entry.is_secret;
        if is_secret {
            ui.message("Current value: (hidden)");
        } else {
            ui.message(&format!("Current value: {}", entry.value));
        }

        let question = format!("Enter new value for {}", key);
        let new_value = if is_secret {
            ui::password(ui, "edit_value", &question)?
        } else {
            ui::input(ui, "edit_value", &question, None)?
        };
        if new_value.is_empty() {
            ui.message("No changes made");
            return Ok(CommandResult::success());
        }

        if !ui::confirm(ui, "edit_save", "Save changes?", false)? {
            ui.message("Changes cancelled");
            return Ok(CommandResult::success());
        }

        env.update([(key.as_str(), new_value.as_str())]);
        env.write(&self.project.env_path())?;
        tracing::info!("Updated {} in .env", key);

        ui.success("Configuration updated");
        ui.show_hint("Restart services for changes to take effect");
        Ok(CommandResult::success())
    }

    fn rotate(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(mut env) = self.load_env(ui)? else {
            return Ok(CommandResult::failure(1));
        };

        ui.show_header("Rotate Secrets");

        let available: Vec<_> = ROTATABLE_SECRETS
            .iter()
            .filter(|(key, _)| env.contains(key))
            .collect();
        if available.is_empty() {
            ui.message("No rotatable secrets found");
            return Ok(CommandResult::success());
        }

        let options = available
            .iter()
            .map(|(key, _)| PromptOption::new(*key, *key))
            .collect();
        let selected = ui::multi_select(ui, "rotate_secrets", "Select secrets to rotate", options)?;
        if selected.is_empty() {
            ui.message("No secrets selected");
            return Ok(CommandResult::success());
        }

        for key in &selected {
            if let Some(warning) = rotation_warning(key) {
                ui.warning(&format!("{}: {}", key, warning));
            }
        }

        if !ui::confirm(ui, "rotate_proceed", "Proceed with rotation?", false)? {
            ui.message("Rotation cancelled");
            return Ok(CommandResult::success());
        }

        fsutil::copy_private(&self.project.env_path(), &self.project.env_backup_path())?;
        ui.success("Backup saved to .env.backup");

        let mut rotated = Vec::new();
        for (key, bytes) in available {
            if !selected.iter().any(|s| s == key) {
                continue;
            }
            let token = generate_secure_token(*bytes);
            if token.is_fallback() {
                ui.warning(&format!(
                    "Secure random source unavailable; {} set to a placeholder. Rotate it again.",
                    key
                ));
            }
            env.update([(*key, token.into_string())]);
            rotated.push(*key);
        }

        env.write(&self.project.env_path())?;
        for key in &rotated {
            ui.success(&format!("Rotated {}", key));
        }
        tracing::info!("Rotated {} secret(s)", rotated.len());

        ui.success("Secrets rotated successfully");
        ui.show_hint("Restart services for changes to take effect");
        if rotated.contains(&"POSTGRES_PASSWORD") {
            ui.message("To update PostgreSQL password, run:");
            ui.show_hint(
                "docker compose exec db psql -U postgres -c \"ALTER USER postgres PASSWORD 'new_password';\"",
            );
        }
        Ok(CommandResult::success())
    }

    fn validate(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(env) = self.load_env(ui)? else {
            return Ok(CommandResult::failure(1));
        };

        ui.show_header("Configuration Validation");

        let mode = fsutil::mode_of(&self.project.env_path()).ok();
        let report = validate_env(&env, mode);

        if report.is_clean() {
            ui.success("Configuration is valid!");
            return Ok(CommandResult::success());
        }

        if !report.issues.is_empty() {
            ui.error("Issues:");
            for issue in &report.issues {
                ui.error(&format!("  ✗ {}", issue));
            }
        }
        if !report.warnings.is_empty() {
            ui.message("Warnings:");
            for warning in &report.warnings {
                ui.warning(&format!("  ⚠ {}", warning));
            }
        }

        if report.is_valid() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }

    fn write(&self, ui: &mut dyn UserInterface, args: &ConfigWriteArgs) -> Result<CommandResult> {
        let snapshot = self.project.snapshot(FlagOverrides::default())?;
        write_config(&snapshot, &args.path, &args.format)?;
        ui.success(&format!("Configuration written to {}", args.path.display()));
        Ok(CommandResult::success())
    }
}

impl Command for ConfigCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            None => self.show(ui, self.args.show_secrets),
            Some(ConfigSubcommand::Show(show)) => {
                self.show(ui, show.show_secrets || self.args.show_secrets)
            }
            Some(ConfigSubcommand::Edit) => self.edit(ui),
            Some(ConfigSubcommand::Rotate) => self.rotate(ui),
            Some(ConfigSubcommand::Validate) => self.validate(ui),
            Some(ConfigSubcommand::Write(args)) => self.write(ui, args),
        }
    }
}
