//! IPC client implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, warn};

use crate::MAX_LINE_LENGTH;
use crate::error::{IpcError, IpcResult};
use crate::events::Event;
use crate::messages::{Method, Request, Response};

/// In-flight requests; `None` once the connection has closed.
type Pending = Arc<Mutex<Option<HashMap<u64, oneshot::Sender<Response>>>>>;

/// IPC client for connecting to the Hushlight daemon.
pub struct IpcClient {
    writer: Mutex<SplitSink<Framed<UnixStream, LinesCodec>, String>>,
    next_id: AtomicU64,
    pending: Pending,
    event_rx: mpsc::Receiver<Event>,
}

impl IpcClient {
    /// Connect to the daemon at the given socket path.
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(socket_path: &Path) -> IpcResult<Self> {
        let stream = UnixStream::connect(socket_path).await?;
        let (writer, mut reader) =
            Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)).split();

        let pending: Pending = Arc::new(Mutex::new(Some(HashMap::new())));
        let (event_tx, event_rx) = mpsc::channel(64);

        let pending_clone = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(line) = reader.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = %e, "Read error");
                        break;
                    }
                };

                if let Ok(response) = serde_json::from_str::<Response>(&line) {
                    let waiter =
                        pending_clone.lock().await.as_mut().and_then(|p| p.remove(&response.id));
                    if let Some(tx) = waiter {
                        let _ = tx.send(response);
                    }
                } else if let Ok(event) = serde_json::from_str::<Event>(&line) {
                    let _ = event_tx.send(event).await;
                } else {
                    warn!("Unknown message format");
                }
            }
            // Dropping the waiters fails their requests.
            *pending_clone.lock().await = None;
            debug!("Connection closed");
        });

        Ok(Self { writer: Mutex::new(writer), next_id: AtomicU64::new(1), pending, event_rx })
    }

    /// Connect to the daemon at the default socket path.
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect_default() -> IpcResult<Self> {
        Self::connect(&crate::socket_path()).await
    }

    /// Send a request and wait for a response.
    ///
    /// # Errors
    /// Returns an error if the request cannot be sent or the connection
    /// closes before the response arrives.
    pub async fn request(&self, method: Method) -> IpcResult<Response> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = Request { id, method };

        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .await
            .as_mut()
            .ok_or(IpcError::ConnectionClosed)?
            .insert(id, tx);

        let json = serde_json::to_string(&request)?;
        if let Err(e) = self.writer.lock().await.send(json).await {
            if let Some(pending) = self.pending.lock().await.as_mut() {
                pending.remove(&id);
            }
            return Err(e.into());
        }

        rx.await.map_err(|_| IpcError::ConnectionClosed)
    }

    /// Get the event receiver for incoming events.
    pub fn events(&mut self) -> &mut mpsc::Receiver<Event> {
        &mut self.event_rx
    }
}
