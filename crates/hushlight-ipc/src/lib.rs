//! Hushlight IPC - Unix socket protocol and client library.
//!
//! Commands reach the daemon as newline-delimited JSON requests; touch and
//! connection changes are pushed back to every connected client as events.

pub mod client;
pub mod error;
pub mod events;
pub mod messages;
pub mod server;

pub use client::IpcClient;
pub use error::{IpcError, IpcResult};
pub use events::{Event, EventType, StateUpdateData};
pub use messages::{ErrorInfo, Method, Request, Response};
pub use server::IpcServer;

use std::path::PathBuf;

/// Longest accepted JSON line.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Get the default socket path.
///
/// Uses `$XDG_RUNTIME_DIR/hushlight/daemon.sock` or falls back to
/// `/run/user/$UID/hushlight/daemon.sock`.
#[must_use]
#[allow(unsafe_code)] // libc::getuid() is safe to call
pub fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("hushlight/daemon.sock")
    } else {
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/run/user/{uid}/hushlight/daemon.sock"))
    }
}
