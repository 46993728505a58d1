//! Plugin configuration file discovery.
//!
//! # Search order
//!
//! 1. `OTF_VAR_<provider_name>_PLUGIN_CONFIGURATION_FILE` (as given, then upper case)
//! 2. `<vendor dir>/terraform-provider-openapi.yaml`
//!
//! The vendor directory is `~/.terraform.d/plugins`, or
//! `%APPDATA%\terraform.d\plugins` on Windows.

use std::path::PathBuf;

use tracing::trace;

use crate::PLUGIN_CONFIGURATION_FILE_NAME;
use crate::env::{EnvSource, multi_env_default_string, plugin_configuration_file_vars};
use crate::error::{ConfigError, ConfigResult};

/// Returns the Terraform plugins vendor directory of the current user.
pub fn plugins_vendor_dir() -> ConfigResult<PathBuf> {
    #[cfg(windows)]
    {
        dirs::config_dir()
            .map(|dir| dir.join("terraform.d").join("plugins"))
            .ok_or_else(|| ConfigError::Location {
                reason: "application data directory not available".to_string(),
            })
    }

    #[cfg(not(windows))]
    {
        dirs::home_dir()
            .map(|dir| dir.join(".terraform.d").join("plugins"))
            .ok_or_else(|| ConfigError::Location {
                reason: "home directory not available".to_string(),
            })
    }
}

/// Returns the path of the plugin configuration file for `provider_name`.
///
/// The path is not checked for existence.
pub fn plugin_configuration_path<E>(provider_name: &str, env: &E) -> ConfigResult<PathBuf>
where
    E: EnvSource + ?Sized,
{
    resolve_path(provider_name, env, plugins_vendor_dir)
}

fn resolve_path<E, F>(provider_name: &str, env: &E, vendor_dir: F) -> ConfigResult<PathBuf>
where
    E: EnvSource + ?Sized,
    F: FnOnce() -> ConfigResult<PathBuf>,
{
    let vars = plugin_configuration_file_vars(provider_name);
    let overridden = multi_env_default_string(env, &vars, "")?;
    if !overridden.is_empty() {
        trace!(var = %vars[0], path = %overridden, "Plugin configuration path overridden");
        return Ok(PathBuf::from(overridden));
    }

    Ok(vendor_dir()?.join(PLUGIN_CONFIGURATION_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;

    fn fixed_vendor_dir() -> ConfigResult<PathBuf> {
        Ok(PathBuf::from("/home/tf/.terraform.d/plugins"))
    }

    #[test]
    fn test_env_override_wins() {
        let env = HashMap::from([(
            "OTF_VAR_example_PLUGIN_CONFIGURATION_FILE".to_string(),
            "/etc/otf/custom.yaml".to_string(),
        )]);
        let path = resolve_path("example", &env, fixed_vendor_dir).unwrap();
        assert_eq!(path, Path::new("/etc/otf/custom.yaml"));
    }

    #[test]
    fn test_upper_case_override() {
        let env = HashMap::from([(
            "OTF_VAR_EXAMPLE_PLUGIN_CONFIGURATION_FILE".to_string(),
            "/etc/otf/upper.yaml".to_string(),
        )]);
        let path = resolve_path("example", &env, fixed_vendor_dir).unwrap();
        assert_eq!(path, Path::new("/etc/otf/upper.yaml"));
    }

    #[test]
    fn test_default_vendor_path() {
        let env = HashMap::new();
        let path = resolve_path("example", &env, fixed_vendor_dir).unwrap();
        assert_eq!(
            path,
            Path::new("/home/tf/.terraform.d/plugins/terraform-provider-openapi.yaml")
        );
    }

    #[test]
    fn test_vendor_dir_error_propagates() {
        let env = HashMap::new();
        let err = resolve_path("example", &env, || {
            Err(ConfigError::Location {
                reason: "home directory not available".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Location { .. }));
    }

    #[test]
    fn test_override_skips_vendor_lookup() {
        let env = HashMap::from([(
            "OTF_VAR_example_PLUGIN_CONFIGURATION_FILE".to_string(),
            "/etc/otf/custom.yaml".to_string(),
        )]);
        let path = resolve_path("example", &env, || {
            Err(ConfigError::Location {
                reason: "must not be called".to_string(),
            })
        })
        .unwrap();
        assert_eq!(path, Path::new("/etc/otf/custom.yaml"));
    }
}
