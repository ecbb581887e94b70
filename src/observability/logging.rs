//! Structured logging and telemetry bootstrap.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (filter, formatter, OTel bridge)
//! - Configure log level from config, overridable via `RUST_LOG`
//! - Flush exporters on shutdown
//!
//! # Design Decisions
//! - Text format for development, JSON for log shippers
//! - Error events inside a span become OTel exception events

use opentelemetry::trace::{TraceError, TracerProvider as _};
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::tracing::{init_tracer, shutdown_tracer, TRACER_NAME};

/// Errors raised while installing telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] TraceError),
}

/// Keeps exporters alive; flushes them when dropped.
#[must_use = "dropping the guard shuts telemetry down"]
#[derive(Debug)]
pub struct TelemetryGuard {
    otlp_enabled: bool,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if self.otlp_enabled {
            shutdown_tracer();
        }
    }
}

/// Install the global subscriber described by `config`.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };

    let (text_layer, json_layer) = match config.log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    let otel_layer = match &config.otlp_endpoint {
        Some(endpoint) => {
            let provider = init_tracer(endpoint, &config.service_name)?;
            Some(
                tracing_opentelemetry::layer()
                    .with_tracer(provider.tracer(TRACER_NAME))
                    .with_error_events_to_status(true)
                    .with_error_events_to_exceptions(true)
                    .with_error_records_to_exceptions(true),
            )
        }
        None => None,
    };
    let otlp_enabled = otel_layer.is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()?;

    log_initialized(config);

    Ok(TelemetryGuard { otlp_enabled })
}

/// Emitted once the subscriber is live, so it reaches every configured sink.
fn log_initialized(config: &ObservabilityConfig) {
    tracing::info!(
        service = %config.service_name,
        log_format = ?config.log_format,
        otlp = config.otlp_endpoint.is_some(),
        otlp_endpoint = config.otlp_endpoint.as_deref().unwrap_or("none"),
        "Telemetry initialized"
    );
}

/// Initialize logging for tests (only logs errors).
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}
