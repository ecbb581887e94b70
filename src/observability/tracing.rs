//! Distributed tracing support.
//!
//! # Responsibilities
//! - Create the `roll` span around each roll
//! - Record the outcome as span attributes and status
//! - Export spans over OTLP when a collector endpoint is configured
//!
//! # Design Decisions
//! - Span fields follow the `tracing-opentelemetry` conventions:
//!   `otel.status_code` / `otel.status_message` map to the span status,
//!   `exception.*` fields to the exception record
//! - Export is optional; without an endpoint spans stay local to the
//!   subscriber
//! - No inbound/outbound trace header propagation

use opentelemetry::global;
use opentelemetry::trace::TraceError;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use tracing::field::{display, Empty};
use tracing::Span;

use crate::dice::{Roll, RollError};

/// Name of the span opened around each roll.
pub const ROLL_SPAN: &str = "roll";

/// Instrumentation scope name of the OpenTelemetry tracer.
pub const TRACER_NAME: &str = "diceroller.tracer";

/// Span status values understood by the OpenTelemetry layer.
pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "ERROR";

/// A `roll` span. The span closes when this value is dropped.
#[derive(Debug)]
pub struct RollSpan {
    span: Span,
}

impl RollSpan {
    /// Open a new `roll` span for `player`.
    pub fn open(player: &str) -> Self {
        let span = tracing::info_span!(
            "roll",
            player = %player,
            "roll.value" = Empty,
            "exception.type" = Empty,
            "exception.message" = Empty,
            "otel.status_code" = Empty,
            "otel.status_message" = Empty,
        );
        Self { span }
    }

    /// Run `f` with this span entered.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.span.in_scope(f)
    }

    /// Attach the rolled value.
    pub fn record_roll(&self, roll: Roll) {
        self.span.record("roll.value", i64::from(roll.value()));
        self.span.record("otel.status_code", STATUS_OK);
    }

    /// Record `err` as the span's exception and mark the span as failed.
    pub fn record_exception(&self, err: &RollError) {
        self.span.record("exception.type", err.kind());
        self.span.record("exception.message", display(err));
        self.span.record("otel.status_code", STATUS_ERROR);
        self.span.record("otel.status_message", display(err));
    }
}

/// Build an OTLP/gRPC span exporter pipeline and register it globally.
///
/// Installs the W3C trace-context propagator alongside the provider.
/// Must be called from within a Tokio runtime.
pub fn init_tracer(endpoint: &str, service_name: &str) -> Result<TracerProvider, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(Config::default().with_resource(Resource::new([KeyValue::new(
            "service.name",
            service_name.to_string(),
        )])))
        .install_batch(runtime::Tokio)?;

    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

/// Flush pending spans and tear down the global tracer provider.
pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}
