//! Answers collected by the setup wizard.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VulcanError};
use crate::project::Environment;
use crate::secrets::generate_secure_token;

/// Byte lengths of the generated production secrets.
pub const POSTGRES_PASSWORD_BYTES: usize = 33;
pub const SECRET_KEY_BASE_BYTES: usize = 64;
pub const CIPHER_PASSWORD_BYTES: usize = 64;
pub const CIPHER_SALT_BYTES: usize = 32;

/// Primary way users sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMethod {
    #[default]
    None,
    Local,
    Oidc,
    Ldap,
}

impl AuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Local => "local",
            Self::Oidc => "oidc",
            Self::Ldap => "ldap",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(Self::None),
            "local" => Ok(Self::Local),
            "oidc" => Ok(Self::Oidc),
            "ldap" => Ok(Self::Ldap),
            other => Err(VulcanError::validation(format!(
                "Unknown auth method '{}'. Use 'oidc', 'ldap', or 'local'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OidcConfig {
    pub provider_title: String,
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LdapConfig {
    pub host: String,
    pub port: String,
    pub base: String,
    pub bind_dn: String,
    pub password: String,
}

/// Outgoing mail. `None` on [`SetupConfig::smtp`] disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmtpConfig {
    pub address: String,
    pub port: String,
    pub username: String,
    pub password: String,
}

/// Everything the wizard writes into `.env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    pub environment: Environment,

    pub web_port: u16,
    pub database_port: u16,

    pub postgres_password: String,

    pub secret_key_base: String,
    pub cipher_password: String,
    pub cipher_salt: String,

    pub auth_method: AuthMethod,
    pub enable_local_auth: bool,
    pub oidc: OidcConfig,
    pub ldap: LdapConfig,

    pub app_url: String,
    pub contact_email: String,
    pub welcome_text: String,

    pub smtp: Option<SmtpConfig>,
}

impl SetupConfig {
    /// Fixed, obviously-insecure values for a local checkout.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            web_port: 3000,
            database_port: 5432,
            postgres_password: "postgres".into(),
            secret_key_base: "development_secret_key_base_not_for_production_use".into(),
            cipher_password: "development_cipher_password_not_for_production_use".into(),
            cipher_salt: "development_cipher_salt_not_for_production_use".into(),
            auth_method: AuthMethod::None,
            enable_local_auth: true,
            oidc: OidcConfig::default(),
            ldap: LdapConfig::default(),
            app_url: "http://localhost:3000".into(),
            contact_email: "admin@example.com".into(),
            welcome_text: "Welcome to Vulcan Development".into(),
            smtp: None,
        }
    }

    /// Production defaults with freshly generated secrets.
    ///
    /// Returns the names of any secrets that fell back to the placeholder
    /// token so the caller can warn the operator.
    pub fn production() -> (Self, Vec<&'static str>) {
        let mut fallbacks = Vec::new();
        let mut token = |name: &'static str, bytes: usize| {
            let token = generate_secure_token(bytes);
            if token.is_fallback() {
                fallbacks.push(name);
            }
            token.into_string()
        };

        let config = Self {
            environment: Environment::Production,
            web_port: 3000,
            database_port: 5432,
            postgres_password: token("POSTGRES_PASSWORD", POSTGRES_PASSWORD_BYTES),
            secret_key_base: token("SECRET_KEY_BASE", SECRET_KEY_BASE_BYTES),
            cipher_password: token("CIPHER_PASSWORD", CIPHER_PASSWORD_BYTES),
            cipher_salt: token("CIPHER_SALT", CIPHER_SALT_BYTES),
            auth_method: AuthMethod::None,
            enable_local_auth: false,
            oidc: OidcConfig::default(),
            ldap: LdapConfig::default(),
            app_url: String::new(),
            contact_email: String::new(),
            welcome_text: String::new(),
            smtp: None,
        };
        (config, fallbacks)
    }

    /// `postgres://` URL the production containers connect with.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://postgres:{}@db:{}/{}",
            self.postgres_password,
            self.database_port,
            Environment::Production.database_name()
        )
    }

    /// Value written for `VULCAN_ENABLE_LOCAL_LOGIN`. A local-only setup
    /// always keeps local login on.
    pub fn local_login_enabled(&self) -> bool {
        self.enable_local_auth || self.auth_method == AuthMethod::Local
    }
}

/// OIDC callback for an app served at `app_url`.
pub fn oidc_redirect_uri(app_url: &str) -> String {
    format!("{}/users/auth/oidc/callback", app_url.trim_end_matches('/'))
}
