//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs (`/` redirect, `/rolldice`)
//!     → dice::DiceRoller
//!     → plain-text response
//! ```

pub mod handlers;
pub mod server;

pub use handlers::{AppState, DEFAULT_PLAYER, ROLL_PATH};
pub use server::{HttpServer, X_REQUEST_ID};
