//! `.env` generation for the setup wizard.

use std::fmt::Write;

use crate::project::Environment;

use super::config::{AuthMethod, SetupConfig};

const RULE: &str =
    "# =============================================================================";

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str("# ");
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

fn line(out: &mut String, key: &str, value: impl std::fmt::Display) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}={}", key, value);
}

/// Render the complete `.env` for `config`.
///
/// The result is the whole file. Section headers are comment lines
/// containing `===`, which `config show` recognizes.
pub fn render_env_file(config: &SetupConfig) -> String {
    let production = config.environment == Environment::Production;
    let mut out = String::new();

    out.push_str("# Vulcan Environment Configuration\n");
    out.push_str("# Generated by vulcan setup wizard\n");
    let _ = writeln!(out, "# Environment: {}", config.environment);

    section(&mut out, "PORTS (No hardcoded ports - all configurable via env vars)");
    line(&mut out, "PORT", config.web_port);
    line(&mut out, "DATABASE_PORT", config.database_port);

    section(&mut out, "DATABASE");
    line(&mut out, "POSTGRES_PASSWORD", &config.postgres_password);
    if production {
        line(&mut out, "DATABASE_URL", config.database_url());
    } else {
        out.push_str("# DATABASE_URL is handled by database.yml in development\n");
    }

    section(&mut out, "RAILS SECRETS");
    line(&mut out, "SECRET_KEY_BASE", &config.secret_key_base);
    line(&mut out, "CIPHER_PASSWORD", &config.cipher_password);
    line(&mut out, "CIPHER_SALT", &config.cipher_salt);

    section(&mut out, "AUTHENTICATION");
    line(&mut out, "VULCAN_ENABLE_LOCAL_LOGIN", config.local_login_enabled());
    line(&mut out, "VULCAN_ENABLE_USER_REGISTRATION", !production);
    line(&mut out, "VULCAN_SESSION_TIMEOUT", 60);

    if config.auth_method == AuthMethod::Oidc {
        let oidc = &config.oidc;
        out.push_str("\n# OIDC Configuration\n");
        line(&mut out, "VULCAN_ENABLE_OIDC", true);
        line(&mut out, "VULCAN_OIDC_PROVIDER_TITLE", &oidc.provider_title);
        line(&mut out, "VULCAN_OIDC_ISSUER_URL", &oidc.issuer_url);
        line(&mut out, "VULCAN_OIDC_CLIENT_ID", &oidc.client_id);
        line(&mut out, "VULCAN_OIDC_CLIENT_SECRET", &oidc.client_secret);
        line(&mut out, "VULCAN_OIDC_REDIRECT_URI", &oidc.redirect_uri);
        line(&mut out, "VULCAN_OIDC_DISCOVERY", true);
    } else {
        line(&mut out, "VULCAN_ENABLE_OIDC", false);
    }

    if config.auth_method == AuthMethod::Ldap {
        let ldap = &config.ldap;
        out.push_str("\n# LDAP Configuration\n");
        line(&mut out, "VULCAN_ENABLE_LDAP", true);
        line(&mut out, "VULCAN_LDAP_HOST", &ldap.host);
        line(&mut out, "VULCAN_LDAP_PORT", &ldap.port);
        line(&mut out, "VULCAN_LDAP_BASE", &ldap.base);
        line(&mut out, "VULCAN_LDAP_BIND_DN", &ldap.bind_dn);
        line(&mut out, "VULCAN_LDAP_ADMIN_PASS", &ldap.password);
    } else {
        line(&mut out, "VULCAN_ENABLE_LDAP", false);
    }

    section(&mut out, "APPLICATION SETTINGS");
    line(&mut out, "VULCAN_APP_URL", &config.app_url);
    line(&mut out, "VULCAN_CONTACT_EMAIL", &config.contact_email);
    line(&mut out, "VULCAN_WELCOME_TEXT", &config.welcome_text);
    line(&mut out, "VULCAN_PROJECT_CREATE_PERMISSION_ENABLED", production);

    section(&mut out, "EMAIL/SMTP");
    line(&mut out, "VULCAN_ENABLE_SMTP", config.smtp.is_some());
    if let Some(smtp) = &config.smtp {
        line(&mut out, "VULCAN_SMTP_ADDRESS", &smtp.address);
        line(&mut out, "VULCAN_SMTP_PORT", &smtp.port);
        line(&mut out, "VULCAN_SMTP_SERVER_USERNAME", &smtp.username);
        line(&mut out, "VULCAN_SMTP_SERVER_PASSWORD", &smtp.password);
    }

    section(&mut out, "PRODUCTION SETTINGS");
    if production {
        line(&mut out, "RAILS_ENV", "production");
        line(&mut out, "RAILS_LOG_TO_STDOUT", true);
        line(&mut out, "RAILS_SERVE_STATIC_FILES", true);
        line(&mut out, "FORCE_SSL", true);
        line(&mut out, "RAILS_MAX_THREADS", 5);
        line(&mut out, "WEB_CONCURRENCY", 2);
    }

    section(&mut out, "NOTES");
    out.push_str("# Default admin login (after seeding): admin@example.com / 1234567ab!\n");
    out.push_str("# To seed the database: bundle exec rails db:seed\n");

    out
}
