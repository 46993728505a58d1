//! Service configuration values.
//!
//! A [`ServiceConfiguration`] is what resolution hands back: where the
//! service's OpenAPI document lives and how it may be fetched. Schema versions
//! each provide their own record type behind this trait.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Resolved settings for one service.
pub trait ServiceConfiguration: Debug + Send + Sync {
    /// Location of the service's discovery document.
    fn swagger_url(&self) -> &str;

    /// Whether TLS certificate verification is skipped when fetching it.
    fn is_insecure_skip_verify_enabled(&self) -> bool;

    /// Plugin version the entry is pinned to, if any.
    fn plugin_version(&self) -> Option<&str> {
        None
    }

    /// Checks the value's own invariants.
    fn validate(&self) -> ConfigResult<()>;
}

/// Version 1 record for a single service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfigV1 {
    /// URL of the service's swagger document.
    #[serde(rename = "swagger-url", alias = "swagger_url")]
    pub swagger_url: String,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Plugin version this entry targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_version: Option<String>,

    /// Per-property schema overrides, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_configuration: Option<serde_yaml::Value>,

    /// Telemetry settings, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<serde_yaml::Value>,
}

impl ServiceConfigV1 {
    /// Creates a record from a URL, the skip-verify flag and an optional
    /// schema configuration block.
    pub fn new(
        swagger_url: impl Into<String>,
        insecure_skip_verify: bool,
        schema_configuration: Option<serde_yaml::Value>,
    ) -> Self {
        Self {
            swagger_url: swagger_url.into(),
            insecure_skip_verify,
            schema_configuration,
            ..Default::default()
        }
    }
}

impl ServiceConfiguration for ServiceConfigV1 {
    fn swagger_url(&self) -> &str {
        &self.swagger_url
    }

    fn is_insecure_skip_verify_enabled(&self) -> bool {
        self.insecure_skip_verify
    }

    fn plugin_version(&self) -> Option<&str> {
        self.plugin_version.as_deref()
    }

    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.swagger_url)
    }
}

fn validate_url(url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::EmptySwaggerUrl);
    }
    Url::parse(url).map_err(|e| ConfigError::invalid_url(url, e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_url_and_flag() {
        let config = ServiceConfigV1::new("https://api.example.com/swagger.json", true, None);
        assert_eq!(config.swagger_url(), "https://api.example.com/swagger.json");
        assert!(config.is_insecure_skip_verify_enabled());
        assert!(config.plugin_version().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_url() {
        let config = ServiceConfigV1::new("", true, None);
        assert!(matches!(config.validate(), Err(ConfigError::EmptySwaggerUrl)));
    }

    #[test]
    fn test_validate_malformed_url() {
        let config = ServiceConfigV1::new("not a url", false, None);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_deserialize_both_url_spellings() {
        let dashed: ServiceConfigV1 =
            serde_yaml::from_str("swagger-url: https://a.example.com/s.json").unwrap();
        let snake: ServiceConfigV1 =
            serde_yaml::from_str("swagger_url: https://a.example.com/s.json").unwrap();
        assert_eq!(dashed, snake);
        assert!(!dashed.insecure_skip_verify);
    }

    #[test]
    fn test_extension_blocks_pass_through() {
        let yaml = r#"
swagger-url: https://a.example.com/s.json
plugin_version: 2.1.0
schema_configuration:
  - schema_property_name: apikey_auth
    default_value: secret
telemetry:
  graphite:
    host: localhost
    port: 8125
"#;
        let config: ServiceConfigV1 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.plugin_version(), Some("2.1.0"));

        let block = config.schema_configuration.as_ref().unwrap();
        assert_eq!(block[0]["default_value"].as_str(), Some("secret"));

        let round: ServiceConfigV1 =
            serde_yaml::from_str(&serde_yaml::to_string(&config).unwrap()).unwrap();
        assert_eq!(round, config);
    }
}
