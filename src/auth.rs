//! Identity provider presets and the `.env` keys each provider owns.

use crate::setup::oidc_redirect_uri;

/// LDAP user attribute written by `auth setup-ldap`.
pub const LDAP_UID_ATTRIBUTE: &str = "sAMAccountName";

/// Default LDAP user filter.
pub const LDAP_DEFAULT_FILTER: &str = "(objectClass=person)";

/// A well-known OIDC provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub name: &'static str,
    pub description: &'static str,
    /// Placeholder shown for the issuer prompt.
    pub issuer_hint: &'static str,
    /// Numbered console steps; empty for custom providers.
    pub instructions: &'static [&'static str],
}

const CALLBACK_HINT: &str = "{your-vulcan-url}/users/auth/oidc/callback";

pub const PROVIDER_PRESETS: &[ProviderPreset] = &[
    ProviderPreset {
        name: "Okta",
        description: "Okta Workforce Identity",
        issuer_hint: "https://your-domain.okta.com",
        instructions: &[
            "Log into Okta Admin Console",
            "Applications → Create App Integration",
            "Select 'OIDC - OpenID Connect' and 'Web Application'",
            "Set Sign-in redirect URI:",
            "Copy Client ID and Client Secret",
        ],
    },
    ProviderPreset {
        name: "Azure AD",
        description: "Microsoft Entra ID / Azure Active Directory",
        issuer_hint: "https://login.microsoftonline.com/{tenant-id}/v2.0",
        instructions: &[
            "Go to Azure Portal → Microsoft Entra ID",
            "App registrations → New registration",
            "Set Redirect URI (Web):",
            "Certificates & secrets → New client secret",
            "Copy Application (client) ID and secret",
            "Note your Tenant ID for the issuer URL",
        ],
    },
    ProviderPreset {
        name: "Auth0",
        description: "Auth0 by Okta",
        issuer_hint: "https://your-tenant.auth0.com",
        instructions: &[
            "Log into Auth0 Dashboard",
            "Applications → Create Application → Regular Web App",
            "Settings → Allowed Callback URLs:",
            "Copy Domain, Client ID, and Client Secret",
        ],
    },
    ProviderPreset {
        name: "Keycloak",
        description: "Red Hat Keycloak / SSO",
        issuer_hint: "https://keycloak.example.com/realms/your-realm",
        instructions: &[
            "Log into Keycloak Admin Console",
            "Select your realm (or create one)",
            "Clients → Create client",
            "Set Valid redirect URIs:",
            "Credentials tab → Copy Client Secret",
        ],
    },
    ProviderPreset {
        name: "Google",
        description: "Google Workspace",
        issuer_hint: "https://accounts.google.com",
        instructions: &[
            "Go to Google Cloud Console",
            "APIs & Services → Credentials",
            "Create OAuth 2.0 Client ID (Web application)",
            "Add Authorized redirect URI:",
            "Copy Client ID and Client Secret",
        ],
    },
    ProviderPreset {
        name: "Custom",
        description: "Any OIDC-compliant provider",
        issuer_hint: "https://your-idp.example.com",
        instructions: &[],
    },
];

impl ProviderPreset {
    pub fn find(name: &str) -> Option<&'static ProviderPreset> {
        PROVIDER_PRESETS.iter().find(|p| p.name == name)
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }

    /// Numbered steps. The callback URL follows any step ending in `:`.
    pub fn instruction_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, step) in self.instructions.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, step));
            if step.ends_with(':') {
                lines.push(format!("   {}", CALLBACK_HINT));
            }
        }
        lines
    }
}

/// Answers from `auth setup-oidc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OidcSetup {
    pub provider_title: String,
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub app_url: String,
    pub enable_local_login: bool,
}

impl OidcSetup {
    pub fn redirect_uri(&self) -> String {
        oidc_redirect_uri(&self.app_url)
    }

    pub fn is_complete(&self) -> bool {
        !self.issuer_url.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Keys to merge into `.env`, in write order.
    pub fn env_updates(&self) -> Vec<(String, String)> {
        let mut updates = vec![
            ("VULCAN_ENABLE_OIDC", "true".to_string()),
            ("VULCAN_OIDC_PROVIDER_TITLE", self.provider_title.clone()),
            ("VULCAN_OIDC_ISSUER_URL", self.issuer_url.clone()),
            ("VULCAN_OIDC_CLIENT_ID", self.client_id.clone()),
            ("VULCAN_OIDC_CLIENT_SECRET", self.client_secret.clone()),
            ("VULCAN_OIDC_REDIRECT_URI", self.redirect_uri()),
            ("VULCAN_OIDC_DISCOVERY", "true".to_string()),
            ("VULCAN_ENABLE_LOCAL_LOGIN", self.enable_local_login.to_string()),
        ];
        if !self.app_url.is_empty() {
            updates.push(("VULCAN_APP_URL", self.app_url.clone()));
        }
        updates.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Answers from `auth setup-ldap`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LdapSetup {
    pub host: String,
    pub use_ssl: bool,
    pub port: String,
    pub base: String,
    pub bind_dn: String,
    pub bind_password: String,
    pub user_filter: String,
    pub enable_local_login: bool,
}

impl LdapSetup {
    /// Port suggested for the chosen transport.
    pub fn default_port(use_ssl: bool) -> &'static str {
        if use_ssl {
            "636"
        } else {
            "389"
        }
    }

    pub fn method(&self) -> &'static str {
        if self.use_ssl {
            "ssl"
        } else {
            "plain"
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.host.is_empty() && !self.base.is_empty()
    }

    pub fn env_updates(&self) -> Vec<(String, String)> {
        [
            ("VULCAN_ENABLE_LDAP", "true".to_string()),
            ("VULCAN_LDAP_HOST", self.host.clone()),
            ("VULCAN_LDAP_PORT", self.port.clone()),
            ("VULCAN_LDAP_BASE", self.base.clone()),
            ("VULCAN_LDAP_BIND_DN", self.bind_dn.clone()),
            ("VULCAN_LDAP_ADMIN_PASS", self.bind_password.clone()),
            ("VULCAN_LDAP_METHOD", self.method().to_string()),
            ("VULCAN_LDAP_UID", LDAP_UID_ATTRIBUTE.to_string()),
            ("VULCAN_ENABLE_LOCAL_LOGIN", self.enable_local_login.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

/// Provider accepted by `auth disable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Oidc,
    Ldap,
}

impl Provider {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "oidc" => Some(Self::Oidc),
            "ldap" => Some(Self::Ldap),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Oidc => "OIDC",
            Self::Ldap => "LDAP",
        }
    }

    pub fn enable_key(self) -> &'static str {
        match self {
            Self::Oidc => "VULCAN_ENABLE_OIDC",
            Self::Ldap => "VULCAN_ENABLE_LDAP",
        }
    }
}

/// OpenID discovery document for `issuer`.
pub fn discovery_url(issuer: &str) -> String {
    format!(
        "{}/.well-known/openid-configuration",
        issuer.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_common_providers() {
        let names: Vec<_> = PROVIDER_PRESETS.iter().map(|p| p.name).collect();
        assert_eq!(names, ["Okta", "Azure AD", "Auth0", "Keycloak", "Google", "Custom"]);
        assert_eq!(
            ProviderPreset::find("Azure AD").unwrap().issuer_hint,
            "https://login.microsoftonline.com/{tenant-id}/v2.0"
        );
        assert_eq!(
            ProviderPreset::find("Google").unwrap().issuer_hint,
            "https://accounts.google.com"
        );
    }

    #[test]
    fn instructions_include_callback() {
        let lines = ProviderPreset::find("Okta").unwrap().instruction_lines();
        assert_eq!(lines[0], "1. Log into Okta Admin Console");
        assert_eq!(lines[4], "   {your-vulcan-url}/users/auth/oidc/callback");
        assert!(ProviderPreset::find("Custom").unwrap().instruction_lines().is_empty());
    }

    #[test]
    fn oidc_updates() {
        let setup = OidcSetup {
            provider_title: "Okta".into(),
            issuer_url: "https://acme.okta.com".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            app_url: "https://vulcan.example.org/".into(),
            enable_local_login: true,
        };
        let updates = setup.env_updates();
        assert!(updates.contains(&(
            "VULCAN_OIDC_REDIRECT_URI".into(),
            "https://vulcan.example.org/users/auth/oidc/callback".into()
        )));
        assert!(updates.contains(&("VULCAN_ENABLE_LOCAL_LOGIN".into(), "true".into())));
        assert_eq!(updates.last().unwrap().0, "VULCAN_APP_URL");
    }

    #[test]
    fn oidc_without_app_url_leaves_it_alone() {
        let setup = OidcSetup {
            issuer_url: "https://idp".into(),
            client_id: "c".into(),
            client_secret: "s".into(),
            ..Default::default()
        };
        assert!(setup.is_complete());
        assert!(!setup.env_updates().iter().any(|(k, _)| k == "VULCAN_APP_URL"));
    }

    #[test]
    fn ldap_updates() {
        let setup = LdapSetup {
            host: "ldap.example.org".into(),
            use_ssl: true,
            port: LdapSetup::default_port(true).into(),
            base: "dc=example,dc=org".into(),
            ..Default::default()
        };
        let updates = setup.env_updates();
        assert!(updates.contains(&("VULCAN_LDAP_PORT".into(), "636".into())));
        assert!(updates.contains(&("VULCAN_LDAP_METHOD".into(), "ssl".into())));
        assert!(updates.contains(&("VULCAN_LDAP_UID".into(), "sAMAccountName".into())));
    }

    #[test]
    fn provider_names() {
        assert_eq!(Provider::parse("OIDC"), Some(Provider::Oidc));
        assert_eq!(Provider::parse("saml"), None);
        assert_eq!(Provider::Ldap.enable_key(), "VULCAN_ENABLE_LDAP");
    }

    #[test]
    fn discovery_url_trims_slash() {
        assert_eq!(
            discovery_url("https://idp.example.org/"),
            "https://idp.example.org/.well-known/openid-configuration"
        );
    }
}
