//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dice.rolls` (counter): successful rolls, labelled by `roll.value` (1-5)
//!
//! Counter handles are registered once against the installed recorder and
//! shared with the request path. Increments are atomic inside the recorder.

use std::net::SocketAddr;

use metrics::{counter, describe_counter, Counter, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::dice::Roll;

/// Counter name for successful rolls.
pub const DICE_ROLLS: &str = "dice.rolls";

/// Label carrying the stringified roll value.
pub const ROLL_VALUE_LABEL: &str = "roll.value";

const SCORING_FACES: usize = 5;

/// Handles for the `dice.rolls` counter, one per scoring face.
#[derive(Clone)]
pub struct RollMetrics {
    rolls: [Counter; SCORING_FACES],
}

impl RollMetrics {
    /// Describe `dice.rolls` and register its per-face handles with the
    /// current recorder. Without an installed recorder the handles are no-ops.
    pub fn register() -> Self {
        describe_counter!(DICE_ROLLS, Unit::Count, "The number of rolls by roll value");

        let rolls = std::array::from_fn(|i| {
            counter!(DICE_ROLLS, ROLL_VALUE_LABEL => (i + 1).to_string())
        });
        Self { rolls }
    }

    /// Count one successful roll.
    pub fn record(&self, roll: Roll) {
        let idx = usize::from(roll.value()) - 1;
        self.rolls[idx].increment(1);
    }
}

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime, before [`RollMetrics::register`].
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics exporter started");
    Ok(())
}
