//! Configuration error types.

use thiserror::Error;

use crate::{PLUGIN_CONFIGURATION_FILE_NAME, SWAGGER_URL_VAR_TEMPLATE};

/// Coarse classification of a [`ConfigError`].
///
/// Callers that need to branch on the failure (rather than print it) match on
/// this tag instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An environment lookup failed.
    EnvLookup,
    /// The configuration file could not be located or opened.
    Location,
    /// The configuration stream could not be read.
    FileRead,
    /// The configuration bytes did not decode into the schema.
    FileParse,
    /// The schema decoded but violates a structural rule.
    SchemaValidation,
    /// The schema holds no entry for the requested service.
    ServiceNotFound,
    /// Neither the environment nor the file yielded a discovery URL.
    MissingConfiguration,
    /// A service configuration failed its own checks.
    ValueValidation,
}

/// Errors that can occur while resolving a service configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable error.
    #[error("failed to read environment variable {var}: {reason}")]
    EnvLookup { var: String, reason: String },

    /// The home or vendor directory could not be determined.
    #[error("failed to locate plugin configuration file: {reason}")]
    Location { reason: String },

    /// Failed to read the configuration file.
    #[error("failed to read {file} configuration file: {source}")]
    FileRead {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error.
    #[error("failed to unmarshal {file} configuration file - error = {source}")]
    FileParse {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The decoded schema is not valid.
    #[error("error occurred while validating '{file}' - error = {source}")]
    SchemaValidation {
        file: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// Declared schema version is not understood.
    #[error(
        "provider configuration version '{version}' not matching current implementation, please use version '1' of provider configuration specification"
    )]
    UnsupportedVersion { version: String },

    /// One entry of the schema is not valid.
    #[error("service '{service}' not valid: {source}")]
    InvalidService {
        service: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// Service missing from the schema.
    #[error("'{service}' not found in provider's services configuration")]
    ServiceNotFound { service: String },

    /// No source produced a discovery URL.
    #[error(
        "swagger url not provided, please export {var} env variable with the URL where '{provider}' service provider is exposing the swagger file OR create a plugin configuration file {file} at ~/.terraform.d/plugins following the Plugin configuration schema specifications",
        var = SWAGGER_URL_VAR_TEMPLATE,
        file = PLUGIN_CONFIGURATION_FILE_NAME
    )]
    MissingConfiguration { provider: String },

    /// The resolved service configuration failed validation.
    #[error("service configuration for '{provider}' not valid: {source}")]
    InvalidServiceConfiguration {
        provider: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// Swagger URL is empty.
    #[error("service swagger URL configuration is empty")]
    EmptySwaggerUrl,

    /// Invalid URL format.
    #[error("service swagger URL '{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ConfigError {
    /// Returns the classification tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EnvLookup { .. } => ErrorKind::EnvLookup,
            Self::Location { .. } => ErrorKind::Location,
            Self::FileRead { .. } => ErrorKind::FileRead,
            Self::FileParse { .. } => ErrorKind::FileParse,
            Self::SchemaValidation { .. }
            | Self::UnsupportedVersion { .. }
            | Self::InvalidService { .. } => ErrorKind::SchemaValidation,
            Self::ServiceNotFound { .. } => ErrorKind::ServiceNotFound,
            Self::MissingConfiguration { .. } => ErrorKind::MissingConfiguration,
            Self::InvalidServiceConfiguration { .. }
            | Self::EmptySwaggerUrl
            | Self::InvalidUrl { .. } => ErrorKind::ValueValidation,
        }
    }

    /// Creates a file read error for the plugin configuration file.
    pub fn file_read(source: std::io::Error) -> Self {
        Self::FileRead {
            file: PLUGIN_CONFIGURATION_FILE_NAME.to_string(),
            source,
        }
    }

    /// Creates a file parse error for the plugin configuration file.
    pub fn file_parse(source: serde_yaml::Error) -> Self {
        Self::FileParse {
            file: PLUGIN_CONFIGURATION_FILE_NAME.to_string(),
            source,
        }
    }

    /// Wraps a structural failure of the plugin configuration file.
    pub fn schema_validation(source: ConfigError) -> Self {
        Self::SchemaValidation {
            file: PLUGIN_CONFIGURATION_FILE_NAME.to_string(),
            source: Box::new(source),
        }
    }

    /// Creates a service not found error.
    pub fn service_not_found(service: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Creates a missing configuration error.
    pub fn missing_configuration(provider: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            provider: provider.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is the "service absent from schema" signal.
    pub fn is_service_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_names_both_remedies() {
        let err = ConfigError::missing_configuration("example");
        let msg = err.to_string();
        assert!(msg.contains("OTF_VAR_<provider_name>_SWAGGER_URL"));
        assert!(msg.contains("terraform-provider-openapi.yaml"));
        assert!(msg.contains("'example'"));
        assert_eq!(err.kind(), ErrorKind::MissingConfiguration);
    }

    #[test]
    fn test_schema_validation_keeps_cause_text() {
        let err = ConfigError::schema_validation(ConfigError::InvalidService {
            service: "cdn".to_string(),
            source: Box::new(ConfigError::EmptySwaggerUrl),
        });
        let msg = err.to_string();
        assert!(msg.contains("terraform-provider-openapi.yaml"));
        assert!(msg.contains("service 'cdn' not valid"));
        assert!(msg.contains("swagger URL configuration is empty"));
        assert_eq!(err.kind(), ErrorKind::SchemaValidation);
    }

    #[test]
    fn test_value_errors_share_kind() {
        assert_eq!(ConfigError::EmptySwaggerUrl.kind(), ErrorKind::ValueValidation);
        assert_eq!(
            ConfigError::invalid_url("nope", "relative URL without a base").kind(),
            ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_service_not_found_is_distinct() {
        let err = ConfigError::service_not_found("cdn");
        assert!(err.is_service_not_found());
        assert!(!ConfigError::EmptySwaggerUrl.is_service_not_found());
        assert!(err.to_string().contains("'cdn'"));
    }
}
