use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use domain::LineConfig;
use serde::{Deserialize, Serialize};

use crate::serial::DEFAULT_KEYWORDS;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8081
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SerialConfig {
    /// Settings for the `[serial.line]` table
    #[serde(default)]
    pub line: LineConfig,
    /// One transaction per device at a time
    #[serde(default = "default_serialize_access")]
    pub serialize_access: bool,
    #[serde(default = "default_discovery_keywords")]
    pub discovery_keywords: Vec<String>,
}

fn default_serialize_access() -> bool {
    true
}
fn default_discovery_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            line: LineConfig::default(),
            serialize_access: default_serialize_access(),
            discovery_keywords: default_discovery_keywords(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    /// Friendly names keyed by port index ("1".."10")
    #[serde(default)]
    pub port_names: HashMap<String, String>,
}

/// Environment variables (e.g. KVM__SERVER__PORT=9000, KVM__SERIAL__LINE__SETTLE_DELAY_MS=750)
fn environment() -> Environment {
    Environment::with_prefix("KVM").separator("__")
}

impl ServiceConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Self::load_with_env(config_dir, environment())
    }

    fn load_with_env(config_dir: &str, env: Environment) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Base settings, optional so the service starts with built-in defaults
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(env)
            .build()?;

        let config: Self = s.try_deserialize()?;
        config
            .serial
            .line
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.serial.line, LineConfig::default());
        assert!(config.serial.serialize_access);
        assert_eq!(config.serial.discovery_keywords.len(), 5);
        assert!(config.port_names.is_empty());
    }

    #[test]
    fn test_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[serial]
serialize_access = false

[serial.line]
settle_delay_ms = 750

[port_names]
"1" = "Router"
"10" = "Backup"
"#
        )
        .unwrap();

        let config = ServiceConfig::load(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.serial.line.settle_delay_ms, 750);
        assert_eq!(config.serial.line.baud_rate, 115_200);
        assert!(!config.serial.serialize_access);
        assert_eq!(config.port_names.get("1").map(String::as_str), Some("Router"));
        assert_eq!(config.port_names.get("10").map(String::as_str), Some("Backup"));
    }

    #[test]
    fn test_invalid_line_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[serial.line]\ndata_bits = 9\n",
        )
        .unwrap();

        assert!(ServiceConfig::load(dir.path().to_str().unwrap()).is_err());
    }

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn test_environment_overrides_line_and_server() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_from(&[
            ("KVM__SERVER__PORT", "9000"),
            ("KVM__SERIAL__LINE__SETTLE_DELAY_MS", "750"),
            ("KVM__SERIAL__SERIALIZE_ACCESS", "false"),
        ]);

        let config = ServiceConfig::load_with_env(dir.path().to_str().unwrap(), env).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.serial.line.settle_delay_ms, 750);
        assert_eq!(config.serial.line.read_cap, 1024);
        assert!(!config.serial.serialize_access);
    }

    #[test]
    fn test_environment_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[serial.line]\nbaud_rate = 9600\nread_timeout_ms = 250\n",
        )
        .unwrap();
        let env = env_from(&[("KVM__SERIAL__LINE__BAUD_RATE", "57600")]);

        let config = ServiceConfig::load_with_env(dir.path().to_str().unwrap(), env).unwrap();

        assert_eq!(config.serial.line.baud_rate, 57_600);
        assert_eq!(config.serial.line.read_timeout_ms, 250);
    }

    #[test]
    fn test_environment_line_values_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_from(&[("KVM__SERIAL__LINE__STOP_BITS", "3")]);

        assert!(ServiceConfig::load_with_env(dir.path().to_str().unwrap(), env).is_err());
    }
}
