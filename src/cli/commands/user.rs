//! User command implementation.
//!
//! Every subcommand runs a short Rails runner script, inside the web
//! container when one is running, and reads back the marker it prints.

use crate::cli::args::{UserArgs, UserSubcommand};
use crate::error::Result;
use crate::project::Project;
use crate::secrets::{
    generate_secure_password, hash_for_logging, validate_password_strength, OutputMasker,
};
use crate::ui::{confirm, input, password, select, PromptOption, UserInterface};
use crate::user::{
    confirm_script, create_admin_script, parse_user_list, reset_password_script, RunnerOutcome,
    ScriptTarget, ADMIN_PASSWORD_LENGTH, LIST_USERS_SCRIPT, RESET_PASSWORD_LENGTH,
};

use super::dispatcher::{Command, CommandResult};

/// The user command implementation.
pub struct UserCommand<'a> {
    project: &'a Project,
    args: UserArgs,
}

impl<'a> UserCommand<'a> {
    pub fn new(project: &'a Project, args: UserArgs) -> Self {
        Self { project, args }
    }

    /// Run `script` and return its stdout, or the failure text with
    /// `secrets` redacted.
    fn run_script(
        &self,
        script: &str,
        secrets: &[&str],
    ) -> Result<std::result::Result<String, String>> {
        let target = ScriptTarget::detect(self.project);
        if target == ScriptTarget::Local {
            tracing::debug!("No web container found, running locally");
        }
        let result = self.project.run(&target.command(self.project, script))?;
        if result.success {
            Ok(Ok(result.stdout))
        } else {
            let reason = if result.stderr.trim().is_empty() {
                format!("exit status {}", result.exit_code.unwrap_or(1))
            } else {
                let mut masker = OutputMasker::new();
                for secret in secrets {
                    masker.add_secret(*secret);
                }
                masker.mask(result.stderr.trim())
            };
            Ok(Err(reason))
        }
    }

    fn email(
        &self,
        ui: &mut dyn UserInterface,
        given: Option<&str>,
        key: &str,
    ) -> Result<Option<String>> {
        let email = match given {
            Some(email) => email.trim().to_string(),
            None => input(ui, key, "User email", None)?,
        };
        if email.is_empty() {
            ui.error("Email is required");
            return Ok(None);
        }
        Ok(Some(email))
    }

    fn list(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Vulcan Users");
        let output = match self.run_script(LIST_USERS_SCRIPT, &[])? {
            Ok(output) => output,
            Err(reason) => {
                ui.error(&format!("Failed to list users: {}", reason));
                return Ok(CommandResult::failure(1));
            }
        };

        let rows = parse_user_list(&output);
        if rows.is_empty() {
            ui.message("No users found");
            return Ok(CommandResult::success());
        }
        ui.message(&format!("  {:<40} {:<10} {}", "EMAIL", "ROLE", "STATUS"));
        ui.message(&format!("  {}", "-".repeat(60)));
        for row in rows {
            let line = format!("  {:<40} {:<10} {}", row.email, row.role, row.status);
            if row.status == "unconfirmed" {
                ui.warning(&line);
            } else {
                ui.message(&line);
            }
        }
        Ok(CommandResult::success())
    }

    /// A password from `--password`, the user, or the generator.
    fn choose_password(
        &self,
        ui: &mut dyn UserInterface,
        given: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(pw) = given {
            if let Err(e) = validate_password_strength(pw) {
                ui.error(&e.to_string());
                return Ok(None);
            }
            return Ok(Some(pw.to_string()));
        }

        let choice = select(
            ui,
            "password_option",
            "Password option",
            vec![
                PromptOption::new("Generate secure password (recommended)", "generate"),
                PromptOption::new("Enter custom password", "custom"),
            ],
            Some("generate"),
        )?;
        if choice != "custom" {
            return generate_secure_password(RESET_PASSWORD_LENGTH).map(Some);
        }

        let pw = password(ui, "new_password", "Enter new password")?;
        if let Err(e) = validate_password_strength(&pw) {
            ui.error(&e.to_string());
            return Ok(None);
        }
        let again = password(ui, "confirm_password", "Confirm password")?;
        if pw != again {
            ui.error("Passwords do not match");
            return Ok(None);
        }
        Ok(Some(pw))
    }

    fn reset_password(
        &self,
        ui: &mut dyn UserInterface,
        email: Option<&str>,
        given: Option<&str>,
    ) -> Result<CommandResult> {
        ui.show_header("Reset User Password");
        let Some(email) = self.email(ui, email, "user_email")? else {
            return Ok(CommandResult::failure(1));
        };
        let Some(new_password) = self.choose_password(ui, given)? else {
            return Ok(CommandResult::failure(1));
        };

        ui.show_hint(&format!("Password hash: {}", hash_for_logging(&new_password)));
        if !confirm(ui, "reset_confirm", &format!("Reset password for {}?", email), false)? {
            ui.message("Cancelled");
            return Ok(CommandResult::success());
        }

        tracing::info!("Resetting password for user {}", hash_for_logging(&email));
        let script = reset_password_script(&email, &new_password);
        let output = match self.run_script(&script, &[new_password.as_str()])? {
            Ok(output) => output,
            Err(reason) => {
                ui.error(&format!("Failed to reset password: {}", reason));
                return Ok(CommandResult::failure(1));
            }
        };

        match RunnerOutcome::parse(&output) {
            RunnerOutcome::Success => {
                ui.success("Password reset successfully!");
                ui.message(&format!("  New password: {}", new_password));
                ui.show_hint("Please share this password securely with the user");
                ui.show_hint("They should change it after first login");
                Ok(CommandResult::success())
            }
            RunnerOutcome::UserNotFound => {
                ui.error(&format!("User not found: {}", email));
                Ok(CommandResult::failure(1))
            }
            other => {
                ui.error("Failed to reset password");
                if let RunnerOutcome::Failed(reason) = other {
                    if !reason.is_empty() {
                        ui.message(&reason);
                    }
                }
                Ok(CommandResult::failure(1))
            }
        }
    }

    fn create_admin(
        &self,
        ui: &mut dyn UserInterface,
        email: Option<&str>,
        name: Option<&str>,
        given: Option<&str>,
    ) -> Result<CommandResult> {
        ui.show_header("Create Admin User");
        let email = match email {
            Some(email) => email.trim().to_string(),
            None => input(ui, "admin_email", "Admin email", None)?,
        };
        if email.is_empty() {
            ui.error("Email is required");
            return Ok(CommandResult::failure(1));
        }
        let local_part = email.split('@').next().unwrap_or_default().to_string();
        let name = match name {
            Some(name) => name.trim().to_string(),
            None => input(ui, "admin_name", "Display name", Some(&local_part))?,
        };
        let name = if name.is_empty() { local_part } else { name };

        let admin_password = match given {
            Some(pw) => {
                if let Err(e) = validate_password_strength(pw) {
                    ui.error(&e.to_string());
                    return Ok(CommandResult::failure(1));
                }
                pw.to_string()
            }
            None => generate_secure_password(ADMIN_PASSWORD_LENGTH)?,
        };

        ui.message(&format!("  Email: {}, Name: {}", email, name));
        if !confirm(ui, "create_admin_confirm", "Create admin account?", false)? {
            ui.message("Cancelled");
            return Ok(CommandResult::success());
        }

        tracing::info!("Creating admin user {}", hash_for_logging(&email));
        let script = create_admin_script(&email, &name, &admin_password);
        let output = match self.run_script(&script, &[admin_password.as_str()])? {
            Ok(output) => output,
            Err(reason) => {
                ui.error(&format!("Failed to create admin: {}", reason));
                return Ok(CommandResult::failure(1));
            }
        };

        match RunnerOutcome::parse(&output) {
            RunnerOutcome::Success => {
                ui.success("Admin account created!");
                ui.message(&format!("  Email:    {}", email));
                ui.message(&format!("  Password: {}", admin_password));
                ui.show_hint("Please share these credentials securely");
                ui.show_hint("The user should change their password after first login");
                Ok(CommandResult::success())
            }
            RunnerOutcome::UserExists => {
                ui.error(&format!("User already exists: {}", email));
                ui.show_hint("Use 'vulcan user reset-password' to change their password");
                Ok(CommandResult::failure(1))
            }
            RunnerOutcome::Failed(reason) if !reason.is_empty() => {
                ui.error(&format!("Failed to create admin: {}", reason));
                Ok(CommandResult::failure(1))
            }
            _ => {
                ui.error("Failed to create admin");
                Ok(CommandResult::failure(1))
            }
        }
    }

    fn confirm_account(&self, ui: &mut dyn UserInterface, email: Option<&str>) -> Result<CommandResult> {
        ui.show_header("Confirm User Account");
        let Some(email) = self.email(ui, email, "user_email")? else {
            return Ok(CommandResult::failure(1));
        };
        if !confirm(ui, "confirm_account", &format!("Confirm account for {}?", email), false)? {
            ui.message("Cancelled");
            return Ok(CommandResult::success());
        }

        tracing::info!("Confirming user {}", hash_for_logging(&email));
        let output = match self.run_script(&confirm_script(&email), &[])? {
            Ok(output) => output,
            Err(reason) => {
                ui.error(&format!("Failed to confirm account: {}", reason));
                return Ok(CommandResult::failure(1));
            }
        };

        match RunnerOutcome::parse(&output) {
            RunnerOutcome::Success => {
                ui.success(&format!("Account confirmed: {}", email));
                Ok(CommandResult::success())
            }
            RunnerOutcome::AlreadyConfirmed => {
                ui.message(&format!("Account already confirmed: {}", email));
                Ok(CommandResult::success())
            }
            RunnerOutcome::UserNotFound => {
                ui.error(&format!("User not found: {}", email));
                Ok(CommandResult::failure(1))
            }
            _ => {
                ui.error("Failed to confirm account");
                Ok(CommandResult::failure(1))
            }
        }
    }
}

impl Command for UserCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            UserSubcommand::List => self.list(ui),
            UserSubcommand::ResetPassword { email, password } => {
                self.reset_password(ui, email.as_deref(), password.as_deref())
            }
            UserSubcommand::CreateAdmin {
                email,
                name,
                password,
            } => self.create_admin(ui, email.as_deref(), name.as_deref(), password.as_deref()),
            UserSubcommand::Confirm { email } => self.confirm_account(ui, email.as_deref()),
        }
    }
}
