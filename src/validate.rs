//! `.env` validation for `vulcan config validate`.
//!
//! Checks are pure over the parsed file; the only filesystem fact they need
//! (the file mode) is passed in by the caller.

use std::sync::LazyLock;

use regex::Regex;

use crate::envfile::EnvFile;

/// Keys the Rails app refuses to boot without.
pub const REQUIRED_KEYS: &[&str] = &["SECRET_KEY_BASE", "CIPHER_PASSWORD", "CIPHER_SALT"];

const OIDC_REQUIRED: &[&str] = &[
    "VULCAN_OIDC_ISSUER_URL",
    "VULCAN_OIDC_CLIENT_ID",
    "VULCAN_OIDC_CLIENT_SECRET",
];

const LDAP_REQUIRED: &[&str] = &["VULCAN_LDAP_HOST", "VULCAN_LDAP_BASE"];

const INSECURE_DB_PASSWORDS: &[&str] = &["postgres", "password", "changeme"];

const MIN_SECRET_KEY_BASE_LEN: usize = 64;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Findings for one `.env` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Hard failures; any of these makes the command exit 1.
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// No hard failures.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }

    fn issue(&mut self, msg: impl Into<String>) {
        self.issues.push(msg.into());
    }

    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate `env`. `mode` is the file's permission bits, when known.
pub fn validate_env(env: &EnvFile, mode: Option<u32>) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_required(env, &mut report);
    check_secret_key_base(env, &mut report);
    check_database_password(env, &mut report);
    check_app_url(env, &mut report);
    check_provider(env, "VULCAN_ENABLE_OIDC", "OIDC", OIDC_REQUIRED, &mut report);
    check_provider(env, "VULCAN_ENABLE_LDAP", "LDAP", LDAP_REQUIRED, &mut report);
    check_contact_email(env, &mut report);

    if let Some(mode) = mode {
        let perms = mode & 0o777;
        if perms & 0o077 != 0 {
            report.issue(format!(
                ".env has insecure permissions ({:o}). Should be 600",
                perms
            ));
        }
    }

    report
}

fn check_required(env: &EnvFile, report: &mut ValidationReport) {
    for key in REQUIRED_KEYS {
        if env.value(key).is_empty() {
            report.issue(format!("Missing required: {}", key));
        }
    }
}

fn check_secret_key_base(env: &EnvFile, report: &mut ValidationReport) {
    let Some(value) = env.get("SECRET_KEY_BASE") else {
        return;
    };
    if value.contains("development") || value.contains("change_me") {
        report.issue("SECRET_KEY_BASE uses insecure development default");
    }
    if value.len() < MIN_SECRET_KEY_BASE_LEN {
        report.warn("SECRET_KEY_BASE should be at least 64 characters");
    }
}

fn check_database_password(env: &EnvFile, report: &mut ValidationReport) {
    if env
        .get("POSTGRES_PASSWORD")
        .is_some_and(|v| INSECURE_DB_PASSWORDS.contains(&v))
    {
        report.issue("POSTGRES_PASSWORD uses insecure default");
    }
}

fn check_app_url(env: &EnvFile, report: &mut ValidationReport) {
    let url = env.value("VULCAN_APP_URL");
    if url.is_empty() {
        return;
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        report.issue("VULCAN_APP_URL must start with http:// or https://");
    }
    if url.starts_with("http://") && env.value("RAILS_ENV") == "production" {
        report.warn("Using HTTP in production (HTTPS recommended)");
    }
}

fn check_provider(
    env: &EnvFile,
    flag: &str,
    label: &str,
    required: &[&str],
    report: &mut ValidationReport,
) {
    if env.value(flag) != "true" {
        return;
    }
    for key in required {
        if env.value(key).is_empty() {
            report.issue(format!("{} enabled but {} is missing", label, key));
        }
    }
}

fn check_contact_email(env: &EnvFile, report: &mut ValidationReport) {
    let email = env.value("VULCAN_CONTACT_EMAIL");
    if email.is_empty() {
        return;
    }
    let valid = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email));
    if !valid {
        report.warn("VULCAN_CONTACT_EMAIL doesn't look like a valid email");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_SECRET: &str =
        "3f9a1c2b7e8d4f6a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b";

    fn env(lines: &[String]) -> EnvFile {
        EnvFile::parse_str(&lines.join("\n"))
    }

    fn valid_lines() -> Vec<String> {
        vec![
            format!("SECRET_KEY_BASE={}", GOOD_SECRET),
            "CIPHER_PASSWORD=0123456789abcdef".into(),
            "CIPHER_SALT=fedcba9876543210".into(),
            "POSTGRES_PASSWORD=9c2e4a61f0".into(),
            "VULCAN_APP_URL=https://vulcan.example.org".into(),
            "VULCAN_CONTACT_EMAIL=ops@example.org".into(),
        ]
    }

    #[test]
    fn complete_file_is_clean() {
        let report = validate_env(&env(&valid_lines()), Some(0o600));
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn missing_required_keys_are_issues() {
        let report = validate_env(&EnvFile::parse_str("PORT=3000\n"), None);
        assert_eq!(
            report.issues,
            vec![
                "Missing required: SECRET_KEY_BASE",
                "Missing required: CIPHER_PASSWORD",
                "Missing required: CIPHER_SALT",
            ]
        );
    }

    #[test]
    fn development_secret_is_an_issue_and_short() {
        let mut lines = valid_lines();
        lines[0] = "SECRET_KEY_BASE=development_secret_key_base_not_for_production_use".into();
        let report = validate_env(&env(&lines), None);
        assert!(report
            .issues
            .contains(&"SECRET_KEY_BASE uses insecure development default".to_string()));
        assert!(report
            .warnings
            .contains(&"SECRET_KEY_BASE should be at least 64 characters".to_string()));
    }

    #[test]
    fn default_database_password_is_rejected() {
        let mut lines = valid_lines();
        lines[3] = "POSTGRES_PASSWORD=postgres".into();
        let report = validate_env(&env(&lines), None);
        assert_eq!(report.issues, vec!["POSTGRES_PASSWORD uses insecure default"]);
    }

    #[test]
    fn app_url_needs_scheme() {
        let mut lines = valid_lines();
        lines[4] = "VULCAN_APP_URL=vulcan.example.org".into();
        let report = validate_env(&env(&lines), None);
        assert_eq!(
            report.issues,
            vec!["VULCAN_APP_URL must start with http:// or https://"]
        );
    }

    #[test]
    fn http_in_production_is_a_warning() {
        let mut lines = valid_lines();
        lines[4] = "VULCAN_APP_URL=http://vulcan.example.org".into();
        lines.push("RAILS_ENV=production".into());
        let report = validate_env(&env(&lines), None);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec!["Using HTTP in production (HTTPS recommended)"]
        );
    }

    #[test]
    fn enabled_oidc_requires_its_settings() {
        let mut lines = valid_lines();
        lines.push("VULCAN_ENABLE_OIDC=true".into());
        lines.push("VULCAN_OIDC_ISSUER_URL=https://idp.example.org".into());
        let report = validate_env(&env(&lines), None);
        assert_eq!(
            report.issues,
            vec![
                "OIDC enabled but VULCAN_OIDC_CLIENT_ID is missing",
                "OIDC enabled but VULCAN_OIDC_CLIENT_SECRET is missing",
            ]
        );
    }

    #[test]
    fn disabled_ldap_is_not_checked() {
        let mut lines = valid_lines();
        lines.push("VULCAN_ENABLE_LDAP=false".into());
        assert!(validate_env(&env(&lines), None).is_clean());

        lines.push("VULCAN_ENABLE_LDAP=TRUE".into());
        assert!(validate_env(&env(&lines), None).is_clean());
    }

    #[test]
    fn enabled_ldap_requires_host_and_base() {
        let mut lines = valid_lines();
        lines.push("VULCAN_ENABLE_LDAP=true".into());
        let report = validate_env(&env(&lines), None);
        assert_eq!(
            report.issues,
            vec![
                "LDAP enabled but VULCAN_LDAP_HOST is missing",
                "LDAP enabled but VULCAN_LDAP_BASE is missing",
            ]
        );
    }

    #[test]
    fn odd_contact_email_is_a_warning() {
        let mut lines = valid_lines();
        lines[5] = "VULCAN_CONTACT_EMAIL=ops-at-example".into();
        let report = validate_env(&env(&lines), None);
        assert_eq!(
            report.warnings,
            vec!["VULCAN_CONTACT_EMAIL doesn't look like a valid email"]
        );
    }

    #[test]
    fn group_readable_file_is_an_issue() {
        let report = validate_env(&env(&valid_lines()), Some(0o100644));
        assert_eq!(
            report.issues,
            vec![".env has insecure permissions (644). Should be 600"]
        );
    }
}
