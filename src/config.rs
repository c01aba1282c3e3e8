//! Configuration Management
//!
//! Resolves the endpoint from the inventory config file and the API keys
//! from the environment. Both sources are injected so that nothing here
//! reaches into ambient process state on its own.

use crate::error::{InventoryError, Result};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Endpoint used when neither the config file nor the environment sets one
pub const DEFAULT_API_ENDPOINT: &str = "https://cloud.tenable.com";

pub const ENV_API_ENDPOINT: &str = "TENABLE_API_ENDPOINT";
pub const ENV_ACCESS_KEY: &str = "TENABLE_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "TENABLE_SECRET_KEY";
pub const ENV_INVENTORY_CONFIG: &str = "TENABLE_INVENTORY_CONFIG";

/// Raw key/value data read from a config source
pub type ConfigData = Mapping;

/// Source of non-secret configuration values
pub trait ConfigReader {
    fn read_config_data(&self, path: &Path) -> Result<ConfigData>;
}

/// Source of environment variables
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads variables from the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Reads the inventory config as a YAML document
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigReader;

impl ConfigReader for YamlConfigReader {
    fn read_config_data(&self, path: &Path) -> Result<ConfigData> {
        let config_error = |message: String| InventoryError::ConfigFile {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        parse_config_data(&content).map_err(config_error)
    }
}

/// Parse YAML text into config data. An empty document yields no keys.
pub fn parse_config_data(content: &str) -> std::result::Result<ConfigData, String> {
    match serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err("expected a mapping at the top level".to_string()),
    }
}

/// Resolved plugin configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_endpoint", &self.api_endpoint)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Read the config source and environment, then validate every field.
    ///
    /// Fails on the first missing or empty option, in the order
    /// `api_endpoint`, `access_key`, `secret_key`.
    pub fn resolve(
        path: &Path,
        reader: &dyn ConfigReader,
        env: &dyn Environment,
        plugin: &'static str,
    ) -> Result<Self> {
        let data = reader.read_config_data(path)?;
        Self::from_sources(&data, env, plugin)
    }

    /// Build a config from already-read config data
    pub fn from_sources(
        data: &ConfigData,
        env: &dyn Environment,
        plugin: &'static str,
    ) -> Result<Self> {
        let api_endpoint = match data.get("api_endpoint") {
            Some(Value::String(endpoint)) => Some(endpoint.clone()),
            Some(_) => None,
            None => Some(
                env.var(ENV_API_ENDPOINT)
                    .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            ),
        };

        let config = Self {
            api_endpoint: require("api_endpoint", api_endpoint, plugin)?,
            access_key: require("access_key", env.var(ENV_ACCESS_KEY), plugin)?,
            secret_key: require("secret_key", env.var(ENV_SECRET_KEY), plugin)?,
        };

        tracing::debug!("Resolved Tenable endpoint: {}", config.api_endpoint);
        Ok(config)
    }
}

fn require(option: &'static str, value: Option<String>, plugin: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(InventoryError::InvalidOption { option, plugin }),
    }
}

/// Default location of the inventory config file
///
/// `TENABLE_INVENTORY_CONFIG` wins, then the user config directory, then
/// `tenable.yml` in the working directory.
pub fn default_config_path(env: &dyn Environment) -> PathBuf {
    config_path_in(env, dirs::config_dir())
}

fn config_path_in(env: &dyn Environment, config_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = env.var(ENV_INVENTORY_CONFIG) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Some(config_dir) = config_dir {
        let path = config_dir.join("tenable-inventory").join("tenable.yml");
        if path.exists() {
            return path;
        }
    }
    PathBuf::from("tenable.yml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUGIN: &str = "jpclipffel.tenable.assets";

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn data(yaml: &str) -> ConfigData {
        parse_config_data(yaml).unwrap()
    }

    #[test]
    fn test_resolves_all_fields() {
        let env = env(&[(ENV_ACCESS_KEY, "ak"), (ENV_SECRET_KEY, "sk")]);
        let config =
            Config::from_sources(&data("api_endpoint: https://tenable.local"), &env, PLUGIN)
                .unwrap();

        assert_eq!(config.api_endpoint, "https://tenable.local");
        assert_eq!(config.access_key, "ak");
        assert_eq!(config.secret_key, "sk");
    }

    #[test]
    fn test_default_endpoint() {
        let env = env(&[(ENV_ACCESS_KEY, "ak"), (ENV_SECRET_KEY, "sk")]);
        let config = Config::from_sources(&data("plugin: jpclipffel.tenable.assets"), &env, PLUGIN)
            .unwrap();
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
    }

    #[test]
    fn test_endpoint_env_fallback() {
        let env = env(&[
            (ENV_API_ENDPOINT, "https://env.example"),
            (ENV_ACCESS_KEY, "ak"),
            (ENV_SECRET_KEY, "sk"),
        ]);
        let config = Config::from_sources(&data(""), &env, PLUGIN).unwrap();
        assert_eq!(config.api_endpoint, "https://env.example");

        // The config file still wins
        let config =
            Config::from_sources(&data("api_endpoint: https://file.example"), &env, PLUGIN)
                .unwrap();
        assert_eq!(config.api_endpoint, "https://file.example");
    }

    #[test]
    fn test_keys_never_read_from_file() {
        let env = env(&[(ENV_SECRET_KEY, "sk")]);
        let err = Config::from_sources(&data("access_key: from-file"), &env, PLUGIN).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidOption { option: "access_key", .. }
        ));
    }

    #[test]
    fn test_missing_secret_key() {
        let env = env(&[(ENV_ACCESS_KEY, "ak")]);
        let err = Config::from_sources(&data(""), &env, PLUGIN).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("\"secret_key\""));
        assert!(err.to_string().contains(PLUGIN));
    }

    #[test]
    fn test_reports_first_failure_only() {
        let err = Config::from_sources(&data(""), &env(&[]), PLUGIN).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidOption { option: "access_key", .. }
        ));
    }

    #[test]
    fn test_empty_values_rejected() {
        let env = env(&[(ENV_ACCESS_KEY, "ak"), (ENV_SECRET_KEY, "")]);
        let err = Config::from_sources(&data(""), &env, PLUGIN).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidOption { option: "secret_key", .. }
        ));

        let env = env_ok();
        let err = Config::from_sources(&data("api_endpoint: ''"), &env, PLUGIN).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidOption { option: "api_endpoint", .. }
        ));
    }

    #[test]
    fn test_non_string_endpoint_rejected() {
        let err = Config::from_sources(&data("api_endpoint: 443"), &env_ok(), PLUGIN).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidOption { option: "api_endpoint", .. }
        ));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = Config::from_sources(&data(""), &env_ok(), PLUGIN).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        assert!(parse_config_data("- a\n- b").is_err());
    }

    #[test]
    fn test_config_path_env_override() {
        let env = env(&[(ENV_INVENTORY_CONFIG, "/etc/ansible/tenable.yml")]);
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            config_path_in(&env, Some(dir.path().to_path_buf())),
            PathBuf::from("/etc/ansible/tenable.yml")
        );
    }

    #[test]
    fn test_config_path_skips_empty_env() {
        let dir = tempfile::tempdir().unwrap();
        let user_config = dir.path().join("tenable-inventory").join("tenable.yml");
        std::fs::create_dir_all(user_config.parent().unwrap()).unwrap();
        std::fs::write(&user_config, "plugin: jpclipffel.tenable.assets\n").unwrap();

        let env = env(&[(ENV_INVENTORY_CONFIG, "")]);
        assert_eq!(config_path_in(&env, Some(dir.path().to_path_buf())), user_config);
    }

    #[test]
    fn test_config_path_falls_back_to_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(&[(ENV_INVENTORY_CONFIG, "")]);

        // The user config dir has no tenable.yml
        assert_eq!(
            config_path_in(&env, Some(dir.path().to_path_buf())),
            PathBuf::from("tenable.yml")
        );
        assert_eq!(config_path_in(&env, None), PathBuf::from("tenable.yml"));
    }

    fn env_ok() -> HashMap<String, String> {
        env(&[(ENV_ACCESS_KEY, "ak"), (ENV_SECRET_KEY, "secret-value")])
    }
}
