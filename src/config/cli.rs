//! Command-line and environment overrides.
//!
//! Precedence: flag / environment variable, then config file, then defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::{DiceConfig, LogFormat};
use crate::config::validation::validate_config;

/// Dice roller demo service with tracing and metrics.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "diceroller")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "DICEROLLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP listener to
    #[arg(short, long, env = "DICEROLLER_BIND")]
    pub bind: Option<String>,

    /// Log filter (trace, debug, info, warn, error or directives)
    #[arg(long, env = "DICEROLLER_LOG")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// OpenTelemetry collector endpoint for trace export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Disable the Prometheus metrics endpoint
    #[arg(long)]
    pub no_metrics: bool,
}

impl Cli {
    /// Resolve the final configuration: file (or defaults), then overrides,
    /// then validation.
    pub fn into_config(self) -> Result<DiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => DiceConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut DiceConfig) {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(endpoint) = self.otlp_endpoint {
            config.observability.otlp_endpoint = Some(endpoint);
        }
        if self.no_metrics {
            config.observability.metrics_enabled = false;
        }
    }
}
