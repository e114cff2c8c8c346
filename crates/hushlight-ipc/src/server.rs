//! IPC server implementation.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

use crate::MAX_LINE_LENGTH;
use crate::error::IpcResult;
use crate::events::Event;
use crate::messages::{ErrorInfo, Request, Response};

/// A request received from a client, with the channel to answer on.
pub type IncomingRequest = (u64, Request, mpsc::Sender<Response>);

/// IPC server that listens for client connections.
pub struct IpcServer {
    listener: UnixListener,
    next_client_id: AtomicU64,
    event_tx: broadcast::Sender<Event>,
    request_tx: mpsc::Sender<IncomingRequest>,
}

impl IpcServer {
    /// Create a new IPC server bound to the given socket path.
    ///
    /// # Errors
    /// Returns an error if the socket cannot be created.
    pub async fn bind(socket_path: &Path) -> IpcResult<(Self, mpsc::Receiver<IncomingRequest>)> {
        if let Some(parent) = socket_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Remove stale socket file if it exists
        if socket_path.exists() {
            tokio::fs::remove_file(socket_path).await?;
        }

        let listener = UnixListener::bind(socket_path)?;
        info!(?socket_path, "IPC server listening");

        let (event_tx, _) = broadcast::channel(256);
        let (request_tx, request_rx) = mpsc::channel(64);

        Ok((Self { listener, next_client_id: AtomicU64::new(1), event_tx, request_tx }, request_rx))
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    let client_id = self.next_client_id.fetch_add(1, Ordering::SeqCst);
                    info!(client_id, "Client connected");

                    let event_rx = self.event_tx.subscribe();
                    let request_tx = self.request_tx.clone();

                    tokio::spawn(async move {
                        if let Err(e) =
                            Self::handle_client(client_id, stream, event_rx, request_tx).await
                        {
                            error!(client_id, error = %e, "Client error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Accept error");
                }
            }
        }
    }

    /// Get a clone of the event sender for broadcasting from other tasks.
    #[must_use]
    pub fn event_sender(&self) -> broadcast::Sender<Event> {
        self.event_tx.clone()
    }

    async fn handle_client(
        client_id: u64,
        stream: UnixStream,
        mut event_rx: broadcast::Receiver<Event>,
        request_tx: mpsc::Sender<IncomingRequest>,
    ) -> IpcResult<()> {
        let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let (response_tx, mut response_rx) = mpsc::channel::<Response>(16);
        let mut discarded = false;

        loop {
            if discarded {
                // A decode error leaves `Framed` paused; rebuilding keeps the
                // buffered bytes and the codec's discard state.
                framed = Framed::from_parts(framed.into_parts());
                discarded = false;
            }

            tokio::select! {
                line = framed.next() => {
                    match line {
                        Some(Ok(line)) => {
                            match parse_request(&line) {
                                Ok(request) => {
                                    debug!(client_id, request_id = request.id, "Received request");
                                    if request_tx.send((client_id, request, response_tx.clone())).await.is_err() {
                                        warn!(client_id, "Request handler is gone");
                                        break;
                                    }
                                }
                                Err(Some(rejection)) => {
                                    framed.send(serde_json::to_string(&rejection)?).await?;
                                }
                                Err(None) => debug!(client_id, "Dropped unanswerable line"),
                            }
                        }
                        Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                            warn!(client_id, max = MAX_LINE_LENGTH, "Discarding oversized line");
                            discarded = true;
                        }
                        Some(Err(e)) => {
                            error!(client_id, error = %e, "Read error");
                            break;
                        }
                        None => {
                            debug!(client_id, "Client disconnected");
                            break;
                        }
                    }
                }

                Some(response) = response_rx.recv() => {
                    framed.send(serde_json::to_string(&response)?).await?;
                }

                event = event_rx.recv() => {
                    match event {
                        Ok(event) => framed.send(serde_json::to_string(&event)?).await?,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(client_id, skipped, "Client lagging, events dropped");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }

        info!(client_id, "Client handler exiting");
        Ok(())
    }
}

/// Decode one request line.
///
/// A line that is valid JSON with a numeric `id` but not a valid request is
/// answered with a rejection; anything else cannot be answered.
fn parse_request(line: &str) -> Result<Request, Option<Response>> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        warn!(error = %e, "Request is not valid JSON");
        None
    })?;
    let id = value.get("id").and_then(Value::as_u64);

    serde_json::from_value::<Request>(value).map_err(|e| {
        warn!(error = %e, ?id, "Invalid request format");
        id.map(|id| Response { id, result: Err(ErrorInfo::new(ErrorInfo::BAD_REQUEST, e.to_string())) })
    })
}
