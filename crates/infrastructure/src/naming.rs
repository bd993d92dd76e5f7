use std::collections::{BTreeMap, HashMap};

use domain::PortNaming;
use domain::PortNumber;
use domain::naming::fallback_name;

/// Port labels from configuration, overridden by `KVM_PORT_{N}_NAME`
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPortNames {
    names: BTreeMap<PortNumber, String>,
}

impl ConfiguredPortNames {
    /// Build from configured names (keyed by port index) and an environment
    /// lookup. Keys that are not ports 1-10 are skipped.
    pub fn new<F>(configured: &HashMap<String, String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut names = BTreeMap::new();

        for (key, name) in configured {
            match key.trim().parse::<i64>().map(PortNumber::new) {
                Ok(Ok(port)) => {
                    names.insert(port, name.clone());
                }
                _ => tracing::warn!(key = %key, "Ignoring port name for unknown port"),
            }
        }

        for port in PortNumber::all() {
            if let Some(name) = env(&format!("KVM_PORT_{}_NAME", port)) {
                if !name.trim().is_empty() {
                    names.insert(port, name);
                }
            }
        }

        tracing::debug!(?names, "Port names resolved");
        Self { names }
    }

    /// Configured names plus the process environment
    pub fn from_env(configured: &HashMap<String, String>) -> Self {
        Self::new(configured, |key| std::env::var(key).ok())
    }
}

impl PortNaming for ConfiguredPortNames {
    fn display_name(&self, port: PortNumber) -> String {
        self.names
            .get(&port)
            .cloned()
            .unwrap_or_else(|| fallback_name(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(raw: i64) -> PortNumber {
        PortNumber::new(raw).unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_fallback_names() {
        let names = ConfiguredPortNames::new(&HashMap::new(), no_env);
        assert_eq!(names.display_name(port(1)), "Server 1");
        assert_eq!(names.display_name(port(10)), "Server 10");
    }

    #[test]
    fn test_configured_names() {
        let configured = HashMap::from([
            ("2".to_string(), "Build box".to_string()),
            ("11".to_string(), "Nowhere".to_string()),
            ("x".to_string(), "Junk".to_string()),
        ]);
        let names = ConfiguredPortNames::new(&configured, no_env);
        assert_eq!(names.display_name(port(2)), "Build box");
        assert_eq!(names.display_name(port(3)), "Server 3");
        assert_eq!(names.names.len(), 1);
    }

    #[test]
    fn test_environment_overrides_configuration() {
        let configured = HashMap::from([("5".to_string(), "From file".to_string())]);
        let env = HashMap::from([
            ("KVM_PORT_5_NAME".to_string(), "From env".to_string()),
            ("KVM_PORT_7_NAME".to_string(), "NAS".to_string()),
            ("KVM_PORT_8_NAME".to_string(), "  ".to_string()),
        ]);
        let names = ConfiguredPortNames::new(&configured, |key| env.get(key).cloned());
        assert_eq!(names.display_name(port(5)), "From env");
        assert_eq!(names.display_name(port(7)), "NAS");
        assert_eq!(names.display_name(port(8)), "Server 8");
    }
}
