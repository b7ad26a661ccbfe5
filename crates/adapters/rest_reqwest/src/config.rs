//! REST adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the cloud REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// API root every request path is joined onto.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Session token sent as `X-HatchBaby-Auth`, if any.
    pub auth_token: Option<String>,
}

impl RestConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.hatchbaby.com/".to_string(),
            timeout_secs: 10,
            auth_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = RestConfig::default();
        assert_eq!(config.base_url, "https://data.hatchbaby.com/");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            base_url = "http://localhost:9000/api/"
            timeout_secs = 3
            auth_token = "secret"
        "#;
        let config: RestConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/api/");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: RestConfig = toml::from_str("timeout_secs = 30").unwrap();
        assert_eq!(config.base_url, "https://data.hatchbaby.com/");
        assert_eq!(config.timeout_secs, 30);
    }
}
