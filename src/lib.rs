//! Dice roller demo service.
//!
//! One HTTP route rolls a six-sided die. Every roll runs inside a `roll`
//! span; successful rolls bump the `dice.rolls` counter and a six is
//! reported as an error on the span, in the logs and as a 500 response.

pub mod config;
pub mod dice;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::DiceConfig;
pub use dice::{DiceRoller, Roll, RollError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
