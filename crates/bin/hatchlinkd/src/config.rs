//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hatchlink.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use hatchlink_adapter_rest_reqwest::RestConfig;
use hatchlink_domain::device::{IotDeviceInfo, Product};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cloud REST API settings.
    pub api: RestConfig,
    /// The device to bridge.
    pub device: DeviceConfig,
    /// Light accessory settings.
    pub accessory: AccessoryConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Identity of the bridged device.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub id: u64,
    pub name: String,
    pub mac_address: String,
    /// Shadow name updates are published to.
    pub thing_name: String,
    /// API product name: `riot`, `riotPlus` or `restoreIot`.
    pub product: Product,
}

/// Light accessory configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccessoryConfig {
    /// Quiet period before hue/saturation/brightness writes are combined and sent.
    pub hsb_debounce_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `hatchlink.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hatchlink.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HATCHLINK_API_URL") {
            self.api.base_url = val;
        }
        if let Ok(val) = std::env::var("HATCHLINK_API_TOKEN") {
            self.api.auth_token = Some(val);
        }
        if let Ok(val) = std::env::var("HATCHLINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.device.mac_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "device.mac_address must not be empty".to_string(),
            ));
        }
        if self.device.thing_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "device.thing_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Device identity handed to the adapter.
    #[must_use]
    pub fn device_info(&self) -> IotDeviceInfo {
        IotDeviceInfo {
            id: self.device.id,
            name: self.device.name.clone(),
            mac_address: self.device.mac_address.clone(),
            thing_name: self.device.thing_name.clone(),
            product: self.device.product,
        }
    }

    #[must_use]
    pub fn hsb_debounce(&self) -> Duration {
        Duration::from_millis(self.accessory.hsb_debounce_ms)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Rest".to_string(),
            mac_address: "00:00:00:00:00:00".to_string(),
            thing_name: "rest-virtual".to_string(),
            product: Product::Rest2ndGen,
        }
    }
}

impl Default for AccessoryConfig {
    fn default() -> Self {
        Self {
            hsb_debounce_ms: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hatchlinkd=info,hatchlink=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://data.hatchbaby.com/");
        assert_eq!(config.device.thing_name, "rest-virtual");
        assert_eq!(config.device.product, Product::Rest2ndGen);
        assert_eq!(config.hsb_debounce(), Duration::from_millis(100));
        assert_eq!(config.logging.filter, "hatchlinkd=info,hatchlink=info");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.accessory.hsb_debounce_ms, 100);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [api]
            base_url = 'http://127.0.0.1:8080/'
            timeout_secs = 2
            auth_token = 'token'

            [device]
            id = 42
            name = 'Nursery'
            mac_address = 'AA:BB:CC:DD:EE:FF'
            thing_name = 'rest-42'
            product = 'riotPlus'

            [accessory]
            hsb_debounce_ms = 250

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.api.timeout_secs, 2);
        assert_eq!(config.api.auth_token.as_deref(), Some("token"));
        assert_eq!(config.hsb_debounce(), Duration::from_millis(250));
        assert_eq!(config.logging.filter, "debug");

        let info = config.device_info();
        assert_eq!(info.id, 42);
        assert_eq!(info.name, "Nursery");
        assert_eq!(info.mac_address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(info.thing_name, "rest-42");
        assert_eq!(info.product, Product::RestPlus2ndGen);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [device]
            name = 'Kids room'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.name, "Kids room");
        assert_eq!(config.device.thing_name, "rest-virtual");
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.device.id, 1);
    }

    #[test]
    fn should_report_parse_error_for_unknown_product() {
        let result: Result<Config, _> = toml::from_str("[device]\nproduct = 'toaster'");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_empty_mac_address() {
        let mut config = Config::default();
        config.device.mac_address = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_empty_thing_name() {
        let mut config = Config::default();
        config.device.thing_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
