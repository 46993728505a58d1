//! Service configuration resolution.
//!
//! # Precedence (highest first)
//!
//! 1. `OTF_VAR_<provider_name>_SWAGGER_URL`, with `OTF_INSECURE_SKIP_VERIFY`
//! 2. The `services.<provider_name>` entry of the plugin configuration file
//!
//! When the environment provides a URL the configuration file is never read.
//!
//! # Example
//!
//! ```rust,ignore
//! use otf_config::PluginConfiguration;
//!
//! let config = PluginConfiguration::from_env("example")?.service_configuration()?;
//! println!("{}", config.swagger_url());
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};

use tracing::{debug, info};

use crate::env::{
    EnvSource, INSECURE_SKIP_VERIFY_VAR, ProcessEnv, insecure_skip_verify,
    multi_env_default_string, swagger_url_vars,
};
use crate::error::{ConfigError, ConfigResult};
use crate::locate::plugin_configuration_path;
use crate::schema::{PluginConfigSchema, PluginConfigSchemaV1};
use crate::service::{ServiceConfigV1, ServiceConfiguration};

/// A single resolution request for one provider.
///
/// The configuration stream, when present, is consumed by
/// [`service_configuration`](Self::service_configuration); the request cannot
/// be resolved twice.
pub struct PluginConfiguration {
    provider_name: String,
    configuration: Option<Box<dyn Read + Send>>,
}

impl fmt::Debug for PluginConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfiguration")
            .field("provider_name", &self.provider_name)
            .field("has_configuration", &self.configuration.is_some())
            .finish()
    }
}

impl PluginConfiguration {
    /// Creates a request without a configuration file.
    pub fn new(provider_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            configuration: None,
        }
    }

    /// Attaches an already opened configuration stream.
    pub fn with_configuration<R>(mut self, reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        self.configuration = Some(Box::new(reader));
        self
    }

    /// Creates a request, opening the configuration file found through the
    /// process environment and the user's plugin directory.
    pub fn from_env(provider_name: impl Into<String>) -> ConfigResult<Self> {
        Self::discover(provider_name, &ProcessEnv)
    }

    /// Creates a request, opening the configuration file found through `env`
    /// and the user's plugin directory.
    ///
    /// A missing file is not an error; the request simply carries no stream.
    pub fn discover<E>(provider_name: impl Into<String>, env: &E) -> ConfigResult<Self>
    where
        E: EnvSource + ?Sized,
    {
        let provider_name = provider_name.into();
        let path = plugin_configuration_path(&provider_name, env)?;
        let request = Self::new(provider_name);

        if !path.try_exists().map_err(ConfigError::file_read)? {
            info!(path = %path.display(), "OpenAPI plugin configuration not present");
            return Ok(request);
        }

        info!(path = %path.display(), "Found OpenAPI plugin configuration");
        let file = File::open(&path).map_err(ConfigError::file_read)?;
        Ok(request.with_configuration(BufReader::new(file)))
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Returns true if a configuration stream is attached.
    pub fn has_configuration(&self) -> bool {
        self.configuration.is_some()
    }

    /// Resolves the provider's service configuration against the process
    /// environment.
    pub fn service_configuration(self) -> ConfigResult<Box<dyn ServiceConfiguration>> {
        self.service_configuration_with(&ProcessEnv)
    }

    /// Resolves the provider's service configuration against `env`.
    pub fn service_configuration_with<E>(
        mut self,
        env: &E,
    ) -> ConfigResult<Box<dyn ServiceConfiguration>>
    where
        E: EnvSource + ?Sized,
    {
        let provider = self.provider_name.as_str();
        let swagger_url_vars = swagger_url_vars(provider);
        let swagger_url = multi_env_default_string(env, &swagger_url_vars, "")?;

        let service_config = if !swagger_url.is_empty() {
            info!(var = %swagger_url_vars[0], value = %swagger_url, "Swagger URL set from environment");
            let skip_verify = insecure_skip_verify(env);
            info!(var = INSECURE_SKIP_VERIFY_VAR, value = skip_verify, "TLS verification flag");

            let schema = PluginConfigSchemaV1::single(
                provider,
                ServiceConfigV1::new(swagger_url, skip_verify, None),
            );
            Some(schema.service_config(provider)?)
        } else if let Some(reader) = self.configuration.take() {
            service_config_from_reader(reader, provider)?
        } else {
            None
        };

        debug!(service_config = ?service_config, "Resolved service configuration");

        let service_config = match service_config {
            Some(config) if !config.swagger_url().is_empty() => config,
            _ => return Err(ConfigError::missing_configuration(provider)),
        };

        service_config
            .validate()
            .map_err(|e| ConfigError::InvalidServiceConfiguration {
                provider: provider.to_string(),
                source: Box::new(e),
            })?;

        Ok(service_config)
    }
}

/// Decodes a configuration stream and looks `service_name` up in it.
///
/// Returns `Ok(None)` when the document is valid but has no such service.
fn service_config_from_reader(
    mut reader: Box<dyn Read + Send>,
    service_name: &str,
) -> ConfigResult<Option<Box<dyn ServiceConfiguration>>> {
    let mut source = Vec::new();
    reader
        .read_to_end(&mut source)
        .map_err(ConfigError::file_read)?;

    let schema = PluginConfigSchemaV1::from_slice(&source)?;
    lookup(&schema, service_name)
}

fn lookup(
    schema: &dyn PluginConfigSchema,
    service_name: &str,
) -> ConfigResult<Option<Box<dyn ServiceConfiguration>>> {
    schema.validate().map_err(ConfigError::schema_validation)?;

    match schema.service_config(service_name) {
        Ok(config) => Ok(Some(config)),
        Err(e) if e.is_service_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
