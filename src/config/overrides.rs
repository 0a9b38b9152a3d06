//! Command-line flag layer.

use super::layers::{ConfigLayer, LayerSource};

/// Settings overrides supplied on the command line.
///
/// Unset or empty flags never clobber a lower layer. Port flags are kept as
/// the raw text the user typed and are dropped when they don't parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    pub ruby_version: Option<String>,
    pub node_version: Option<String>,
    pub registry: Option<String>,
    pub image: Option<String>,
    pub version: Option<String>,
    pub port: Option<String>,
    pub prometheus_port: Option<String>,
}

impl FlagOverrides {
    /// Build the flag layer.
    pub fn to_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::new(LayerSource::Flags);

        let strings = [
            ("build.ruby_version", &self.ruby_version),
            ("build.node_version", &self.node_version),
            ("build.registry", &self.registry),
            ("build.image", &self.image),
            ("build.version", &self.version),
        ];
        for (path, value) in strings {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                layer.set(path, v);
            }
        }

        let ports = [
            ("ports.web", &self.port),
            ("ports.prometheus", &self.prometheus_port),
        ];
        for (path, value) in ports {
            let Some(raw) = value.as_deref() else { continue };
            match raw.trim().parse::<i64>() {
                Ok(port) => layer.set(path, port),
                Err(_) => tracing::debug!("Ignoring non-numeric {} override '{}'", path, raw),
            }
        }

        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_produce_empty_layer() {
        assert!(FlagOverrides::default().to_layer().is_empty());
    }

    #[test]
    fn empty_strings_are_ignored() {
        let flags = FlagOverrides {
            image: Some(String::new()),
            ..Default::default()
        };
        assert!(flags.to_layer().is_empty());
    }

    #[test]
    fn string_flags_are_applied() {
        let flags = FlagOverrides {
            registry: Some("ghcr.io/acme".into()),
            version: Some("v2.1.0".into()),
            ..Default::default()
        };
        let layer = flags.to_layer();
        assert_eq!(layer.values["build"]["registry"], "ghcr.io/acme");
        assert_eq!(layer.values["build"]["version"], "v2.1.0");
    }

    #[test]
    fn numeric_ports_are_applied_as_integers() {
        let flags = FlagOverrides {
            port: Some("8443".into()),
            ..Default::default()
        };
        assert_eq!(flags.to_layer().values["ports"]["web"], 8443);
    }

    #[test]
    fn non_numeric_ports_are_silently_ignored() {
        let flags = FlagOverrides {
            port: Some("eighty".into()),
            prometheus_port: Some("".into()),
            ..Default::default()
        };
        assert!(flags.to_layer().is_empty());
    }
}
