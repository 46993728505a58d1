//! `otf` - resolve the OpenAPI document location of a Terraform provider.
//!
//! ```text
//! otf resolve example
//! otf resolve example --config ./terraform-provider-openapi.yaml --output yaml
//! otf locate example
//! ```

mod logging;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use otf_config::{PluginConfiguration, ProcessEnv, ServiceConfiguration, plugin_configuration_path};
use serde::Serialize;
use tracing::debug;

use crate::logging::{LogFormat, LogOutput, LoggingBuilder};

#[derive(Debug, Parser)]
#[command(name = "otf", version, about = "Resolve OpenAPI Terraform provider configuration")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Extra filter directive, e.g. `otf_config=trace` (repeatable).
    #[arg(long = "log-directive", global = true)]
    log_directives: Vec<String>,

    /// Log destination.
    #[arg(long, global = true, value_enum, default_value_t = LogOutput::Stderr)]
    log_output: LogOutput,

    /// Log file path; implies `--log-output file`.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the service configuration of a provider.
    Resolve {
        /// Provider name (terraform-provider-<provider_name>).
        provider: String,

        /// Read this configuration file instead of the discovered one.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output encoding.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },

    /// Print where the plugin configuration file is looked up.
    Locate {
        /// Provider name (terraform-provider-<provider_name>).
        provider: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Serialize)]
struct ResolvedConfiguration<'a> {
    provider: &'a str,
    swagger_url: &'a str,
    insecure_skip_verify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugin_version: Option<&'a str>,
}

impl<'a> ResolvedConfiguration<'a> {
    fn new(provider: &'a str, config: &'a dyn ServiceConfiguration) -> Self {
        Self {
            provider,
            swagger_url: config.swagger_url(),
            insecure_skip_verify: config.is_insecure_skip_verify_enabled(),
            plugin_version: config.plugin_version(),
        }
    }

    fn render(&self, format: OutputFormat) -> Result<String> {
        let text = match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
        };
        Ok(text)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Command::Resolve {
            provider,
            config,
            output,
        } => resolve(&provider, config, output),
        Command::Locate { provider } => locate(&provider),
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = LoggingBuilder::new()
        .with_level(cli.log_level)
        .format(cli.log_format)
        .output(cli.log_output);
    for directive in &cli.log_directives {
        builder = builder.directive(directive);
    }
    if let Some(path) = &cli.log_file {
        builder = builder.output(LogOutput::File).file_path(path.clone());
    }
    builder.init();
}

fn resolve(provider: &str, config: Option<PathBuf>, output: OutputFormat) -> Result<()> {
    let request = match config {
        Some(path) => {
            debug!(path = %path.display(), "Using explicit configuration file");
            let file = File::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            PluginConfiguration::new(provider).with_configuration(BufReader::new(file))
        }
        None => PluginConfiguration::from_env(provider)?,
    };

    let service_config = request.service_configuration()?;
    let resolved = ResolvedConfiguration::new(provider, service_config.as_ref());
    println!("{}", resolved.render(output)?);
    Ok(())
}

fn locate(provider: &str) -> Result<()> {
    let path = plugin_configuration_path(provider, &ProcessEnv)?;
    let state = if path.exists() { "present" } else { "absent" };
    println!("{} ({state})", path.display());
    Ok(())
}
