//! Hushlight Daemon - presence light control service.
//!
//! Owns the USB presence light, drives it from a command queue and exposes
//! display commands and touch events over a local socket.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod observer;
mod server;
mod signals;

use hushlight_hid::{Controller, HidApiBackend};
use hushlight_ipc::{IpcServer, Response, socket_path};

use crate::observer::BroadcastObserver;
use crate::server::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.daemon.log_level.parse().context("Invalid daemon.log_level")?),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Hushlight daemon");

    let controller_config = config.controller_config()?;
    info!(device = %controller_config.connection.device, "Configuration loaded");

    // Start IPC server
    let socket = config.ipc.socket_path.clone().unwrap_or_else(socket_path);
    info!(?socket, "Starting IPC server");
    let (ipc_server, mut request_rx) =
        IpcServer::bind(&socket).await.context("Failed to start IPC server")?;
    let event_tx = ipc_server.event_sender();
    let ipc_handle = tokio::spawn(async move {
        ipc_server.run().await;
    });

    // Start the display controller
    let backend = HidApiBackend::new().context("Failed to initialize hidapi")?;
    let controller = Controller::spawn(
        controller_config,
        Arc::new(backend),
        Arc::new(BroadcastObserver::new(event_tx)),
    )
    .context("Failed to start display controller")?;

    let mut shutdown_rx = signals::setup_signal_handlers()?;

    info!("Daemon running. Press Ctrl+C to exit.");

    loop {
        tokio::select! {
            Some((client_id, request, response_tx)) = request_rx.recv() => {
                debug!(client_id, request_id = request.id, "Handling IPC request");

                let handle_result = server::handle_request(&request.method, &controller.status());
                let response = Response { id: request.id, result: handle_result.response };
                let _ = response_tx.send(response).await;

                match handle_result.action {
                    Some(Action::Apply(command)) => controller.apply(command),
                    Some(Action::Shutdown) => break,
                    None => {}
                }
            }

            _ = &mut shutdown_rx => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // Cleanup
    info!("Shutting down...");
    ipc_handle.abort();
    tokio::task::spawn_blocking(move || controller.shutdown())
        .await
        .context("Display controller shutdown task failed")?;

    if let Err(e) = std::fs::remove_file(&socket) {
        warn!(error = %e, ?socket, "Failed to remove socket file");
    }

    info!("Hushlight daemon stopped");
    Ok(())
}
