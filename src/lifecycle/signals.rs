//! OS signal handling.
//!
//! SIGINT and SIGTERM both request a graceful shutdown. On non-Unix
//! targets only Ctrl+C is observed.

/// Resolve once a termination signal is received.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!(signal = "SIGINT", "Shutdown signal received");
        }
        _ = terminate.recv() => {
            tracing::info!(signal = "SIGTERM", "Shutdown signal received");
        }
    }
    Ok(())
}

/// Resolve once a termination signal is received.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!(signal = "ctrl-c", "Shutdown signal received");
    Ok(())
}
