//! Grouping of `.env` keys for the interactive editor.

use super::entry::EnvEntry;

/// Editor category. The order of [`CATEGORIES`] is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Database,
    Authentication,
    Email,
    Application,
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Database => "Database",
            Category::Authentication => "Authentication",
            Category::Email => "Email",
            Category::Application => "Application",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Key fragments per category. Checked top to bottom.
pub const CATEGORIES: &[(Category, &[&str])] = &[
    (Category::Database, &["POSTGRES", "DATABASE"]),
    (Category::Authentication, &["AUTH", "OIDC", "LDAP", "LOGIN"]),
    (Category::Email, &["SMTP", "EMAIL"]),
    (Category::Application, &["APP", "URL", "WELCOME", "CONTACT"]),
];

/// First category whose fragments appear in `key`.
pub fn categorize(key: &str) -> Category {
    CATEGORIES
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| key.contains(f)))
        .map(|(cat, _)| *cat)
        .unwrap_or(Category::Other)
}

/// Keyed entries grouped by category, as indices into `entries`.
///
/// Empty categories are omitted. Groups follow category order.
pub fn group_entries(entries: &[EnvEntry]) -> Vec<(Category, Vec<usize>)> {
    let mut groups: Vec<(Category, Vec<usize>)> = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        if entry.is_comment || entry.key.is_empty() {
            continue;
        }
        let cat = categorize(&entry.key);
        match groups.iter_mut().find(|(c, _)| *c == cat) {
            Some((_, indices)) => indices.push(idx),
            None => groups.push((cat, vec![idx])),
        }
    }
    groups.sort_by_key(|(cat, _)| *cat);
    groups
}
