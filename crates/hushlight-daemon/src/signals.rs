//! Signal handling for graceful shutdown.

use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::oneshot;
use tracing::info;

/// Set up signal handlers for graceful shutdown.
///
/// The returned receiver completes on the first SIGTERM or SIGINT.
pub fn setup_signal_handlers() -> Result<oneshot::Receiver<()>> {
    let (tx, rx) = oneshot::channel();
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    tokio::spawn(async move {
        tokio::select! {
            _ = terminate.recv() => info!("Received SIGTERM"),
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    info!("Received SIGINT");
                }
            }
        }
        let _ = tx.send(());
    });

    Ok(rx)
}
