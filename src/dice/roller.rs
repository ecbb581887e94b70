//! Roll orchestration: span, draw, metrics, log line.

use std::error::Error;
use std::sync::Arc;

use crate::dice::{roll, Die, Roll, RollError};
use crate::observability::{RollMetrics, RollSpan};

/// Plays one roll per request against a shared die and counter set.
#[derive(Clone)]
pub struct DiceRoller {
    die: Arc<dyn Die>,
    metrics: RollMetrics,
}

impl DiceRoller {
    pub fn new(die: Arc<dyn Die>, metrics: RollMetrics) -> Self {
        Self { die, metrics }
    }

    /// Roll once for `player`.
    ///
    /// The `roll` span is entered for the whole call and closed on return,
    /// whichever way the roll goes. Only successful rolls are counted.
    pub fn play(&self, player: &str) -> Result<Roll, RollError> {
        let span = RollSpan::open(player);

        span.in_scope(|| match roll(self.die.as_ref()) {
            Ok(roll) => {
                span.record_roll(roll);
                self.metrics.record(roll);
                tracing::warn!(
                    player = %player,
                    value = roll.value(),
                    "{} is rolling the dice: {}",
                    player,
                    roll
                );
                Ok(roll)
            }
            Err(err) => {
                span.record_exception(&err);
                tracing::error!(
                    error = &err as &(dyn Error + 'static),
                    "Exception while rolling: {}",
                    err
                );
                Err(err)
            }
        })
    }
}
