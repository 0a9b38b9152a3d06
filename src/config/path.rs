//! Dotted settings paths over a value tree.

use serde_yaml::{Mapping, Value};

/// Find the value at a dotted path such as `auth.oidc.issuer_url`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |node, segment| node.as_mapping()?.get(segment))
}

/// Set the value at a dotted path, creating intermediate mappings.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut node = root;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        if !node.is_mapping() {
            *node = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(map) = node else {
            return;
        };
        let key = Value::String(segment.to_string());
        if segments.peek().is_none() {
            map.insert(key, value);
            return;
        }
        node = map
            .entry(key)
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }
}

/// Every leaf path in `root`, in tree order.
///
/// Empty mappings (such as `docker.build_args`) have no addressable leaves
/// and are skipped.
pub fn leaf_paths(root: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect(root, String::new(), &mut out);
    out
}

fn collect(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect(child, path, out);
            }
        }
        _ if !prefix.is_empty() => out.push(prefix),
        _ => {}
    }
}

/// Environment variable name bound to a settings path.
///
/// `auth.oidc.issuer_url` becomes `VULCAN_AUTH_OIDC_ISSUER_URL`.
pub fn env_var_name(path: &str) -> String {
    format!("VULCAN_{}", path.replace('.', "_").to_uppercase())
}
