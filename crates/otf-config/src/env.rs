//! Environment variable lookup.
//!
//! Every service-scoped variable is checked under two names: the name built
//! with the service name exactly as given, then its upper-cased form. The
//! first candidate holding a non-empty value wins.
//!
//! Lookups go through the [`EnvSource`] trait so that callers (and tests) can
//! hand the resolver an explicit map instead of the process environment.

use std::collections::HashMap;
use std::env::VarError;

use crate::error::{ConfigError, ConfigResult};

/// Template of the per-service discovery URL override.
pub const SWAGGER_URL_VAR_TEMPLATE: &str = "OTF_VAR_<provider_name>_SWAGGER_URL";

/// Global (not service-scoped) TLS verification bypass.
pub const INSECURE_SKIP_VERIFY_VAR: &str = "OTF_INSECURE_SKIP_VERIFY";

/// A readable set of environment variables.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> ConfigResult<Option<String>>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> ConfigResult<Option<String>> {
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e @ VarError::NotUnicode(_)) => Err(ConfigError::EnvLookup {
                var: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> ConfigResult<Option<String>> {
        Ok(self.get(name).cloned())
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> ConfigResult<Option<String>> {
        (**self).var(name)
    }
}

/// Returns `OTF_VAR_<service>_SWAGGER_URL` candidates for `service`.
pub fn swagger_url_vars(service: &str) -> Vec<String> {
    candidates(format!("OTF_VAR_{service}_SWAGGER_URL"))
}

/// Returns `OTF_VAR_<service>_PLUGIN_CONFIGURATION_FILE` candidates for `service`.
pub fn plugin_configuration_file_vars(service: &str) -> Vec<String> {
    candidates(format!("OTF_VAR_{service}_PLUGIN_CONFIGURATION_FILE"))
}

fn candidates(name: String) -> Vec<String> {
    let upper = name.to_uppercase();
    if upper == name {
        vec![name]
    } else {
        vec![name, upper]
    }
}

/// Returns the first non-empty value among `names`, or `default`.
pub fn multi_env_default_string<E, S>(env: &E, names: &[S], default: &str) -> ConfigResult<String>
where
    E: EnvSource + ?Sized,
    S: AsRef<str>,
{
    for name in names {
        if let Some(value) = env.var(name.as_ref())? {
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }
    Ok(default.to_string())
}

/// Parses a boolean using the conventional spellings.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`; anything else
/// is `None`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Reads [`INSECURE_SKIP_VERIFY_VAR`]; unset or unparseable means `false`.
///
/// A failed lookup is folded into `false` as well, the flag never fails
/// resolution.
pub fn insecure_skip_verify<E: EnvSource + ?Sized>(env: &E) -> bool {
    env.var(INSECURE_SKIP_VERIFY_VAR)
        .ok()
        .flatten()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false)
}
