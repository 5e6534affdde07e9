use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::errors::{VoiceError, VoiceResult};
use crate::platform_prompts::ExportStyle;

pub const SERVICE_CONFIG_FILE: &str = "imv_config.json";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_EXPORT_CACHE_CAPACITY: usize = 128;

pub const ENV_HOST: &str = "IMV_HOST";
pub const ENV_PORT: &str = "IMV_PORT";
pub const ENV_LOG_DIR: &str = "IMV_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    // Daily rolling log files go here when set
    pub log_dir: Option<String>,
    pub export_style: ExportStyle,
    // 0 disables export caching
    pub export_cache_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            export_style: ExportStyle::default(),
            export_cache_capacity: DEFAULT_EXPORT_CACHE_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Apply `IMV_HOST`, `IMV_PORT` and `IMV_LOG_DIR` from the process environment.
    pub fn apply_env_overrides(&mut self) -> VoiceResult<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> VoiceResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| VoiceError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port)))?;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|d| !d.trim().is_empty()) {
            self.log_dir = Some(dir);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub struct ServiceConfigManager {
    config_file: String,
    config: Mutex<ServiceConfig>,
}

impl ServiceConfigManager {
    pub fn new(config_file: &str) -> Self {
        Self {
            config_file: config_file.to_string(),
            config: Mutex::new(ServiceConfig::default()),
        }
    }

    pub fn load_config(&self) -> VoiceResult<ServiceConfig> {
        let config_path = Path::new(&self.config_file);

        // If the file doesn't exist, return the default config
        if !config_path.exists() {
            return Ok(ServiceConfig::default());
        }

        let config_str = fs::read_to_string(config_path)?;
        let config: ServiceConfig = serde_json::from_str(&config_str)?;

        *self.config.lock() = config.clone();

        Ok(config)
    }

    pub fn save_config(&self, config: &ServiceConfig) -> VoiceResult<()> {
        let config_str = serde_json::to_string_pretty(config)?;

        *self.config.lock() = config.clone();

        // Create the directory if it doesn't exist
        if let Some(parent) = Path::new(&self.config_file).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.config_file, config_str)?;
        Ok(())
    }

    pub fn get_config(&self) -> ServiceConfig {
        self.config.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let manager = ServiceConfigManager::new(path.to_str().unwrap());

        let config = manager.load_config().unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SERVICE_CONFIG_FILE);
        let manager = ServiceConfigManager::new(path.to_str().unwrap());

        let config = ServiceConfig {
            port: 9090,
            export_style: ExportStyle::FullProfile,
            export_cache_capacity: 0,
            ..Default::default()
        };
        manager.save_config(&config).unwrap();

        let reloaded = ServiceConfigManager::new(path.to_str().unwrap()).load_config().unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(manager.get_config(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SERVICE_CONFIG_FILE);
        fs::write(&path, r#"{ "port": 3000, "export_style": "full_profile" }"#).unwrap();

        let config = ServiceConfigManager::new(path.to_str().unwrap()).load_config().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.export_style, ExportStyle::FullProfile);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SERVICE_CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let result = ServiceConfigManager::new(path.to_str().unwrap()).load_config();
        assert!(matches!(result, Err(VoiceError::Serialization(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_HOST, "0.0.0.0"), (ENV_PORT, "8181"), (ENV_LOG_DIR, "/tmp/imv")]
            .into_iter()
            .collect();
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8181");
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/imv"));
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = ServiceConfig::default();
        let result = config.apply_overrides(|key| (key == ENV_PORT).then(|| "eighty".to_string()));
        assert!(matches!(result, Err(VoiceError::Config(_))));
    }
}
