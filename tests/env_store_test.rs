//! `.env` store behaviour through the public library API.

use std::fs;
use tempfile::TempDir;
use vulcan::envfile::EnvFile;
use vulcan::project::Environment;
use vulcan::secrets::{is_secret, validate_password_strength};
use vulcan::setup::{render_env_file, SetupConfig};
use vulcan::validate::validate_env;

const SAMPLE: &str = "\
# Vulcan Environment Configuration

# === Database ===
POSTGRES_PASSWORD=postgres
DATABASE_PORT=5432

# === Application ===
VULCAN_APP_URL=http://localhost:3000
";

#[test]
fn update_keeps_layout_and_appends_new_keys() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".env");
    fs::write(&path, SAMPLE).unwrap();

    let mut env = EnvFile::parse(&path).unwrap();
    env.update([
        ("DATABASE_PORT", "6543"),
        ("VULCAN_CONTACT_EMAIL", "ops@example.org"),
    ]);
    env.write(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let expected = SAMPLE.replace("DATABASE_PORT=5432", "DATABASE_PORT=6543")
        + "VULCAN_CONTACT_EMAIL=ops@example.org\n";
    assert_eq!(written, expected);
}

#[cfg(unix)]
#[test]
fn writes_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".env");
    fs::write(&path, SAMPLE).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    EnvFile::parse(&path).unwrap().write(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = EnvFile::parse(&temp.path().join(".env")).unwrap_err();
    assert!(matches!(err, vulcan::VulcanError::NotFound { .. }));
    assert!(EnvFile::parse_or_empty(&temp.path().join(".env"))
        .unwrap()
        .entries()
        .is_empty());
}

#[test]
fn secrets_are_classified_by_key_name() {
    let env = EnvFile::parse_str(SAMPLE);
    let secret: Vec<_> = env.pairs().filter(|e| e.is_secret).map(|e| e.key.as_str()).collect();
    assert_eq!(secret, vec!["POSTGRES_PASSWORD"]);
    assert!(is_secret("vulcan_oidc_client_secret"));
    assert!(!is_secret("VULCAN_APP_URL"));
}

#[test]
fn generated_production_file_validates() {
    let (config, fallbacks) = SetupConfig::production();
    assert!(fallbacks.is_empty());
    assert_eq!(config.environment, Environment::Production);

    let env = EnvFile::parse_str(&render_env_file(&config));
    assert_eq!(env.value("RAILS_ENV"), "production");
    let report = validate_env(&env, Some(0o600));
    assert!(report.is_valid(), "issues: {:?}", report.issues);
}

#[test]
fn development_defaults_flag_insecure_values() {
    let env = EnvFile::parse_str(&render_env_file(&SetupConfig::development()));
    assert_eq!(env.value("POSTGRES_PASSWORD"), "postgres");
    let report = validate_env(&env, Some(0o644));
    assert!(!report.is_valid());
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("insecure permissions (644)")));
}

#[test]
fn password_policy() {
    assert!(validate_password_strength("Str0ng!Password").is_ok());
    assert!(validate_password_strength("alllowercase1!").is_err());
    assert!(validate_password_strength("Sh0rt!").is_err());
}
