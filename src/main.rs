//! Dice roller demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐    ┌──────────────┐    ┌──────────┐
//!     ───────────────────▶│   http   │───▶│ dice::roller │───▶│ dice::die│
//!                         │  server  │    └──────┬───────┘    └──────────┘
//!     Client Response     │          │           │
//!     ◀───────────────────│ handlers │           ▼
//!                         └──────────┘    ┌──────────────────────────────┐
//!                                         │ observability                │
//!                                         │  roll span · dice.rolls      │
//!                                         │  logs · OTLP · Prometheus    │
//!                                         └──────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use diceroller::config::Cli;
use diceroller::dice::{DiceRoller, RandomDie};
use diceroller::http::HttpServer;
use diceroller::lifecycle::{wait_for_signal, Shutdown};
use diceroller::observability::{init_metrics, init_telemetry, RollMetrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    let _telemetry = init_telemetry(&config.observability)?;

    tracing::info!("diceroller v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        metrics_enabled = config.observability.metrics_enabled,
        otlp_endpoint = ?config.observability.otlp_endpoint,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // The recorder has to be in place before the counter handles register.
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }
    let roller = Arc::new(DiceRoller::new(Arc::new(RandomDie), RollMetrics::register()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, roller);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let exited_early = tokio::select! {
        res = &mut server_task => Some(res),
        res = wait_for_signal() => {
            res?;
            None
        }
    };

    match exited_early {
        Some(res) => res??,
        None => {
            shutdown.trigger();
            server_task.await??;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
