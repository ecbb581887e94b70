//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (subscriber, structured log events)
//!     → metrics.rs (dice.rolls counter)
//!     → tracing.rs (roll span, attributes, status)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → OTLP collector (optional)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::logging::{init_telemetry, TelemetryError, TelemetryGuard};
pub use self::metrics::{init_metrics, RollMetrics};
pub use self::tracing::RollSpan;
