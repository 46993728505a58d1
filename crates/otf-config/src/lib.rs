//! OTF Config - plugin configuration resolution for the OpenAPI Terraform provider.
//!
//! This crate answers one question for a named provider: where is the
//! service's OpenAPI document, and may it be fetched without TLS verification?
//!
//! Two sources are consulted, in order:
//!
//! - `OTF_VAR_<provider_name>_SWAGGER_URL` (plus `OTF_INSECURE_SKIP_VERIFY`)
//! - the plugin configuration file `terraform-provider-openapi.yaml`
//!
//! ```yaml
//! version: '1'
//! services:
//!   example:
//!     swagger-url: https://api.example.com/swagger.json
//!     insecure_skip_verify: false
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use otf_config::{PluginConfiguration, ServiceConfiguration};
//!
//! let config = PluginConfiguration::from_env("example")?.service_configuration()?;
//! assert!(!config.swagger_url().is_empty());
//! ```
//!
//! Library code only emits `tracing` events; installing a subscriber is up to
//! the binary.

pub mod env;
pub mod error;
pub mod locate;
pub mod resolver;
pub mod schema;
pub mod service;

/// File name of the plugin configuration file.
pub const PLUGIN_CONFIGURATION_FILE_NAME: &str = "terraform-provider-openapi.yaml";

// Re-exports
pub use env::{EnvSource, INSECURE_SKIP_VERIFY_VAR, ProcessEnv, SWAGGER_URL_VAR_TEMPLATE};
pub use error::{ConfigError, ConfigResult, ErrorKind};
pub use locate::{plugin_configuration_path, plugins_vendor_dir};
pub use resolver::PluginConfiguration;
pub use schema::{PluginConfigSchema, PluginConfigSchemaV1, SCHEMA_VERSION_V1};
pub use service::{ServiceConfigV1, ServiceConfiguration};
