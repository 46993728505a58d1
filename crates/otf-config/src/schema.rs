//! Plugin configuration schema definitions.
//!
//! The configuration file is decoded into a versioned schema. Each version
//! implements [`PluginConfigSchema`], so the resolver only ever talks to the
//! capability and a new version can be added next to [`PluginConfigSchemaV1`]
//! without touching the resolution logic.

use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::service::{ServiceConfigV1, ServiceConfiguration};

/// Version string understood by [`PluginConfigSchemaV1`].
pub const SCHEMA_VERSION_V1: &str = "1";

/// A decoded plugin configuration document.
pub trait PluginConfigSchema: Debug {
    /// Returns the configuration of `service_name`.
    ///
    /// An absent entry yields [`ConfigError::ServiceNotFound`].
    fn service_config(&self, service_name: &str) -> ConfigResult<Box<dyn ServiceConfiguration>>;

    /// Checks the structural invariants of the document.
    fn validate(&self) -> ConfigResult<()>;
}

/// Version 1 of the plugin configuration file.
///
/// ```yaml
/// version: '1'
/// services:
///   example:
///     swagger-url: https://api.example.com/swagger.json
///     insecure_skip_verify: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfigSchemaV1 {
    /// Declared schema version. Absent means the current one.
    #[serde(
        default,
        deserialize_with = "deserialize_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// Per-service configuration keyed by service name.
    #[serde(default, deserialize_with = "deserialize_services")]
    pub services: HashMap<String, ServiceConfigV1>,
}

impl PluginConfigSchemaV1 {
    /// Creates a schema from a service map.
    pub fn new(services: HashMap<String, ServiceConfigV1>) -> Self {
        Self {
            version: Some(SCHEMA_VERSION_V1.to_string()),
            services,
        }
    }

    /// Creates a schema holding exactly one service.
    pub fn single(service_name: impl Into<String>, config: ServiceConfigV1) -> Self {
        Self::new(HashMap::from([(service_name.into(), config)]))
    }

    /// Decodes a schema from YAML bytes.
    ///
    /// An empty or null document decodes to an empty schema.
    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        serde_yaml::from_slice::<Option<Self>>(bytes)
            .map(Option::unwrap_or_default)
            .map_err(ConfigError::file_parse)
    }

    /// Returns the effective schema version.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(SCHEMA_VERSION_V1)
    }

    /// Returns the configured service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// Accepts both `version: 1` and `version: '1'`.
fn deserialize_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid version: expected a string or a number, found {other:?}"
        ))),
    }
}

// `services: ~` is the same as no services at all.
fn deserialize_services<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, ServiceConfigV1>, D::Error>
where
    D: Deserializer<'de>,
{
    let services = Option::<HashMap<String, ServiceConfigV1>>::deserialize(deserializer)?;
    Ok(services.unwrap_or_default())
}

impl PluginConfigSchema for PluginConfigSchemaV1 {
    fn service_config(&self, service_name: &str) -> ConfigResult<Box<dyn ServiceConfiguration>> {
        self.services
            .get(service_name)
            .map(|config| Box::new(config.clone()) as Box<dyn ServiceConfiguration>)
            .ok_or_else(|| ConfigError::service_not_found(service_name))
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.version() != SCHEMA_VERSION_V1 {
            return Err(ConfigError::UnsupportedVersion {
                version: self.version().to_string(),
            });
        }

        // Walk in name order so the reported entry is stable.
        for name in self.service_names() {
            if let Some(config) = self.services.get(name) {
                config.validate().map_err(|e| ConfigError::InvalidService {
                    service: name.to_string(),
                    source: Box::new(e),
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(url: &str) -> ServiceConfigV1 {
        ServiceConfigV1::new(url, false, None)
    }

    #[test]
    fn test_service_config_found() {
        let schema = PluginConfigSchemaV1::single("cdn", service("https://cdn.example.com/s.json"));
        let config = schema.service_config("cdn").unwrap();
        assert_eq!(config.swagger_url(), "https://cdn.example.com/s.json");
    }

    #[test]
    fn test_service_config_not_found() {
        let schema = PluginConfigSchemaV1::single("cdn", service("https://cdn.example.com/s.json"));
        let err = schema.service_config("dns").unwrap_err();
        assert!(err.is_service_not_found());
    }

    #[test]
    fn test_validate_empty_schema() {
        let schema = PluginConfigSchemaV1::default();
        assert!(schema.validate().is_ok());
        assert!(schema.service_config("anything").unwrap_err().is_service_not_found());
    }

    #[test]
    fn test_validate_reports_first_invalid_entry() {
        let schema = PluginConfigSchemaV1::new(HashMap::from([
            ("alpha".to_string(), service("https://alpha.example.com")),
            ("beta".to_string(), service("")),
            ("gamma".to_string(), service("not a url")),
        ]));
        let err = schema.validate().unwrap_err();
        match err {
            ConfigError::InvalidService { service, source } => {
                assert_eq!(service, "beta");
                assert!(matches!(*source, ConfigError::EmptySwaggerUrl));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_unsupported_version() {
        let schema: PluginConfigSchemaV1 = serde_yaml::from_str(
            "version: '2'\nservices:\n  cdn:\n    swagger-url: https://cdn.example.com\n",
        )
        .unwrap();
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { ref version } if version == "2"));
    }

    #[test]
    fn test_version_defaults_when_absent() {
        let schema = PluginConfigSchemaV1::from_slice(
            b"services:\n  example:\n    swagger_url: https://file.example.com/spec.json\n",
        )
        .unwrap();
        assert_eq!(schema.version(), "1");
        assert!(schema.validate().is_ok());
        assert_eq!(schema.service_names(), vec!["example"]);
    }

    #[test]
    fn test_numeric_version_accepted() {
        let schema = PluginConfigSchemaV1::from_slice(b"version: 1\nservices: {}\n").unwrap();
        assert_eq!(schema.version(), "1");
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_empty_and_null_documents_are_empty_schema() {
        let documents: [&[u8]; 7] = [
            b"",
            b"  \n",
            b"# only a comment\n",
            b"---\n",
            b"~\n",
            b"services:\n",
            b"services: ~\n",
        ];
        for document in documents {
            let schema = PluginConfigSchemaV1::from_slice(document)
                .unwrap_or_else(|e| panic!("{:?}: {e}", String::from_utf8_lossy(document)));
            assert!(schema.services.is_empty());
            assert!(schema.validate().is_ok());
        }
    }

    #[test]
    fn test_from_slice_rejects_wrong_shape() {
        let err = PluginConfigSchemaV1::from_slice(b"services: [1, 2, 3]").unwrap_err();
        assert!(matches!(err, ConfigError::FileParse { .. }));
    }

    #[test]
    fn test_serialize_round_trip() {
        let schema = PluginConfigSchemaV1::single("cdn", service("https://cdn.example.com/s.json"));
        let yaml = serde_yaml::to_string(&schema).unwrap();
        assert!(yaml.contains("swagger-url"));
        assert_eq!(PluginConfigSchemaV1::from_slice(yaml.as_bytes()).unwrap(), schema);
    }
}
