//! Dice rolling subsystem.
//!
//! # Data Flow
//! ```text
//! GET /rolldice
//!     → roller.rs (open span, draw, record outcome, log)
//!     → die.rs (draw a face, six is unlucky)
//!     → observability (span attributes, dice.rolls counter)
//! ```
//!
//! # Design Decisions
//! - A six is an error value, not a panic: `Result<Roll, RollError>`
//! - The die is a trait so draws can be forced in tests
//! - Roller state is created once and shared via Arc

pub mod die;
pub mod roller;

pub use die::{roll, Die, LoadedDie, RandomDie, Roll, RollError};
pub use roller::DiceRoller;
