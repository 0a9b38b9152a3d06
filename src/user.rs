//! Rails runner scripts for user administration.
//!
//! Scripts print a single marker line that [`RunnerOutcome::parse`] turns
//! back into a result. Everything interpolated into a script goes through
//! [`escape_single_quotes`].

use crate::docker::find_web_container;
use crate::project::Project;
use crate::shell::CommandSpec;

/// Length of passwords generated by `user reset-password`.
pub const RESET_PASSWORD_LENGTH: usize = 20;

/// Length of passwords generated by `user create-admin`.
pub const ADMIN_PASSWORD_LENGTH: usize = 16;

/// Lists users as `email\trole\tstatus` lines.
pub const LIST_USERS_SCRIPT: &str = "User.order(:email).each { |u| puts \"#{u.email}\\t#{u.admin? ? 'admin' : 'user'}\\t#{u.confirmed_at ? 'active' : 'unconfirmed'}\" }";

/// Make `value` safe inside a Ruby single-quoted string.
pub fn escape_single_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn reset_password_script(email: &str, password: &str) -> String {
    format!(
        "user = User.find_by(email: '{email}'); \
         if user; user.password = '{pw}'; user.password_confirmation = '{pw}'; user.save!; puts 'SUCCESS'; \
         else; puts 'USER_NOT_FOUND'; end",
        email = escape_single_quotes(email),
        pw = escape_single_quotes(password),
    )
}

pub fn create_admin_script(email: &str, name: &str, password: &str) -> String {
    format!(
        "if User.exists?(email: '{email}'); puts 'USER_EXISTS'; \
         else; user = User.new(email: '{email}', name: '{name}', password: '{pw}', password_confirmation: '{pw}', admin: true, confirmed_at: Time.current); \
         if user.save; puts 'SUCCESS'; else; puts 'FAILED: ' + user.errors.full_messages.join(', '); end; end",
        email = escape_single_quotes(email),
        name = escape_single_quotes(name),
        pw = escape_single_quotes(password),
    )
}

pub fn confirm_script(email: &str) -> String {
    format!(
        "user = User.find_by(email: '{email}'); \
         if user.nil?; puts 'USER_NOT_FOUND'; \
         elsif user.confirmed_at; puts 'ALREADY_CONFIRMED'; \
         else; user.update!(confirmed_at: Time.current); puts 'SUCCESS'; end",
        email = escape_single_quotes(email),
    )
}

/// Marker a user script printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerOutcome {
    Success,
    UserNotFound,
    UserExists,
    AlreadyConfirmed,
    /// `FAILED: <reason>` or no recognizable marker.
    Failed(String),
}

impl RunnerOutcome {
    /// Find the marker in runner output. Specific markers win over SUCCESS
    /// so a stray log line cannot mask them.
    pub fn parse(output: &str) -> Self {
        if output.contains("USER_NOT_FOUND") {
            Self::UserNotFound
        } else if output.contains("USER_EXISTS") {
            Self::UserExists
        } else if output.contains("ALREADY_CONFIRMED") {
            Self::AlreadyConfirmed
        } else if output.contains("SUCCESS") {
            Self::Success
        } else if let Some(reason) = output
            .lines()
            .find_map(|l| l.trim().strip_prefix("FAILED:"))
        {
            Self::Failed(reason.trim().to_string())
        } else {
            Self::Failed(output.trim().to_string())
        }
    }
}

/// A row of `user list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub email: String,
    pub role: String,
    pub status: String,
}

/// Parse list output, dropping container runtime noise and short lines.
pub fn parse_user_list(output: &str) -> Vec<UserRow> {
    output
        .lines()
        .filter(|line| !line.contains("OCI runtime"))
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let email = fields.next()?.trim();
            let role = fields.next()?.trim();
            let status = fields.next()?.trim();
            Some(UserRow {
                email: email.to_string(),
                role: role.to_string(),
                status: status.to_string(),
            })
        })
        .collect()
}

/// Where user scripts run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTarget {
    /// `docker exec -i <name> bin/rails runner`.
    Container(String),
    /// The local Rails runner.
    Local,
}

impl ScriptTarget {
    pub fn detect(project: &Project) -> Self {
        match find_web_container(project) {
            Some(name) => Self::Container(name),
            None => Self::Local,
        }
    }

    /// Capture-mode command that runs `script`.
    pub fn command(&self, project: &Project, script: &str) -> CommandSpec {
        let spec = match self {
            Self::Container(name) => project.command(
                "docker",
                ["exec", "-i", name.as_str(), "bin/rails", "runner", script],
            ),
            Self::Local => project.local_rails(["runner", script]),
        };
        // Scripts carry emails and passwords.
        spec.capture().redacting(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandResult, MockRunner};
    use std::collections::HashMap;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(escape_single_quotes("o'brien@example.org"), "o\\'brien@example.org");
        let script = reset_password_script("x'; User.destroy_all; '", "pw");
        assert!(script.contains("email: 'x\\'; User.destroy_all; \\''"));
    }

    #[test]
    fn scripts_embed_values() {
        let script = create_admin_script("ana@example.org", "Ana", "S3cure!pass");
        assert!(script.contains("User.exists?(email: 'ana@example.org')"));
        assert!(script.contains("name: 'Ana'"));
        assert!(script.contains("admin: true"));
        assert!(confirm_script("ana@example.org").contains("ALREADY_CONFIRMED"));
    }

    #[test]
    fn outcome_markers() {
        assert_eq!(RunnerOutcome::parse("SUCCESS\n"), RunnerOutcome::Success);
        assert_eq!(RunnerOutcome::parse("USER_NOT_FOUND"), RunnerOutcome::UserNotFound);
        assert_eq!(RunnerOutcome::parse("USER_EXISTS"), RunnerOutcome::UserExists);
        assert_eq!(
            RunnerOutcome::parse("ALREADY_CONFIRMED"),
            RunnerOutcome::AlreadyConfirmed
        );
        assert_eq!(
            RunnerOutcome::parse("FAILED: Email is invalid"),
            RunnerOutcome::Failed("Email is invalid".into())
        );
    }

    #[test]
    fn list_parser_skips_noise() {
        let out = "a@example.org\tadmin\tactive\n\
                   OCI runtime exec failed\tx\ty\n\
                   broken line\n\
                   b@example.org\tuser\tunconfirmed\n";
        let rows = parse_user_list(out);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, "admin");
        assert_eq!(rows[1].status, "unconfirmed");
    }

    #[test]
    fn container_target_uses_docker_exec() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        runner.respond("docker ps", CommandResult::success("vulcan-web-1\n"));
        let project = Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(runner.clone());

        let target = ScriptTarget::detect(&project);
        assert_eq!(target, ScriptTarget::Container("vulcan-web-1".into()));
        let spec = target.command(&project, "puts 1");
        assert_eq!(
            spec.command_line(),
            "docker exec -i vulcan-web-1 bin/rails runner puts 1"
        );
        assert_eq!(spec.display(), "docker exec -i vulcan-web-1 bin/rails runner [REDACTED]");
    }

    #[test]
    fn local_target_uses_bundle() {
        let temp = TempDir::new().unwrap();
        let runner = Rc::new(MockRunner::new());
        runner.fail("docker ps");
        let project = Project::new(temp.path())
            .with_env(HashMap::new())
            .with_runner(runner.clone())
            .with_container_marker(temp.path().join("no-dockerenv"));

        let target = ScriptTarget::detect(&project);
        assert_eq!(target, ScriptTarget::Local);
        assert_eq!(
            target.command(&project, "puts 1").command_line(),
            "bundle exec rails runner puts 1"
        );
    }
}
