//! Device connection management and the touch read loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use hushlight_core::sequence::connected_sequence;
use hushlight_core::{Color, CommandQueue, DisplaySink, Mode, ShutdownSignal, TouchEdge, TouchState};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::device::{DeviceId, DeviceIo, HidBackend};
use crate::observer::{DeviceObserver, TOUCH_STATE_KEY};
use crate::report::{self, INPUT_REPORT_LEN};

/// Connection settings.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionConfig {
    /// Device to look for
    pub device: DeviceId,
    /// Back-off after the device was absent or could not be opened
    pub reconnect_interval: Duration,
    /// Read timeout of the touch read loop
    pub io_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            device: DeviceId::default(),
            reconnect_interval: Duration::from_secs(5),
            io_timeout: Duration::from_millis(100),
        }
    }
}

/// State guarded by the connection lock.
struct Link {
    io: Option<Arc<dyn DeviceIo>>,
    /// Bumped whenever the handle is replaced or dropped; read loops of
    /// older sessions exit when they notice.
    session: u64,
    touch: TouchState,
}

struct Shared {
    link: Mutex<Link>,
    connected: AtomicBool,
    observer: Arc<dyn DeviceObserver>,
}

impl Shared {
    /// Drop the handle of `session` (if still current) and report the loss.
    fn mark_lost(&self, session: u64, reason: &str) {
        {
            let mut link = self.link.lock();
            if link.session != session {
                return;
            }
            link.io = None;
            link.session += 1;
        }
        self.set_connected(false, reason);
    }

    fn set_connected(&self, connected: bool, reason: &str) {
        if self.connected.swap(connected, Ordering::SeqCst) != connected {
            if connected {
                info!(reason, "Presence light connected");
            } else {
                warn!(reason, "Presence light disconnected");
            }
            self.observer.connection_changed(connected);
        }
    }

    fn apply_touch(&self, edge: TouchEdge) {
        let changed = {
            let mut link = self.link.lock();
            let next = link.touch.apply(edge);
            if let Some(state) = next {
                link.touch = state;
            }
            next
        };

        if let Some(state) = changed {
            info!(state = state.as_str(), "Touch state changed");
            self.observer.state_update(TOUCH_STATE_KEY, state.as_str());
        }
    }
}

/// Owns the single device handle and the `connected` flag.
pub struct Connection {
    backend: Arc<dyn HidBackend>,
    config: ConnectionConfig,
    queue: Arc<CommandQueue>,
    shutdown: ShutdownSignal,
    shared: Arc<Shared>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
    /// Create a disconnected connection manager.
    ///
    /// The acknowledgement sequence is pushed onto `queue` after every
    /// successful open.
    #[must_use]
    pub fn new(
        backend: Arc<dyn HidBackend>,
        config: ConnectionConfig,
        queue: Arc<CommandQueue>,
        observer: Arc<dyn DeviceObserver>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            backend,
            config,
            queue,
            shutdown,
            shared: Arc::new(Shared {
                link: Mutex::new(Link { io: None, session: 0, touch: TouchState::default() }),
                connected: AtomicBool::new(false),
                observer,
            }),
            reader: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn touch_state(&self) -> TouchState {
        self.shared.link.lock().touch
    }

    /// Make sure the device is open.
    ///
    /// Returns `false` after waiting the reconnect interval if the device is
    /// absent or cannot be opened. Returns `true` immediately when already
    /// connected.
    pub fn probe_and_connect(&self) -> bool {
        let device = self.config.device;
        let present = self.backend.is_present(device).unwrap_or_else(|e| {
            warn!(device = %device, error = %e, "Device enumeration failed");
            false
        });

        if !present {
            let session = self.shared.link.lock().session;
            self.shared.mark_lost(session, "device absent");
            error!(device = %device, "Presence light not found");
            self.shutdown.wait_timeout(self.config.reconnect_interval);
            return false;
        }

        if self.is_connected() {
            return true;
        }

        match self.backend.open(device) {
            Ok(io) => {
                self.install(io);
                true
            }
            Err(e) => {
                error!(device = %device, error = %e, "Could not establish connection to presence light");
                self.shutdown.wait_timeout(self.config.reconnect_interval);
                false
            }
        }
    }

    /// Write a color and mode. No-op while disconnected; a failed write
    /// marks the connection as lost.
    pub fn write_command(&self, color: Color, mode: Mode) {
        if !self.is_connected() {
            return;
        }

        let report = report::output_report(color, mode);
        let failed = {
            let link = self.shared.link.lock();
            let Some(io) = link.io.as_ref() else {
                return;
            };
            match io.write_report(&report) {
                Ok(_) => {
                    debug!(%color, ?mode, code = report[1], "Command written");
                    None
                }
                Err(e) => {
                    error!(%color, ?mode, error = %e, "Device write failed");
                    Some(link.session)
                }
            }
        };

        if let Some(session) = failed {
            self.shared.mark_lost(session, "write failed");
        }
    }

    /// Blank the light (best effort), release the handle and stop the
    /// read loop.
    pub fn close(&self) {
        self.write_command(Color::NoColor, Mode::Dim);

        let session = self.shared.link.lock().session;
        self.shared.mark_lost(session, "closed");

        if let Some(reader) = self.reader.lock().take()
            && reader.join().is_err()
        {
            warn!("Touch read loop panicked");
        }
        info!("Presence light connection closed");
    }

    fn install(&self, io: Arc<dyn DeviceIo>) {
        let session = {
            let mut link = self.shared.link.lock();
            link.session += 1;
            link.io = Some(Arc::clone(&io));
            link.session
        };

        let previous = self.reader.lock().take();
        if let Some(previous) = previous
            && previous.join().is_err()
        {
            warn!("Previous touch read loop panicked");
        }

        let shared = Arc::clone(&self.shared);
        let shutdown = self.shutdown.clone();
        let timeout = self.config.io_timeout;
        let spawned = std::thread::Builder::new()
            .name("hushlight-touch".to_string())
            .spawn(move || read_loop(&shared, &*io, session, &shutdown, timeout));

        match spawned {
            Ok(handle) => *self.reader.lock() = Some(handle),
            Err(e) => error!(error = %e, "Failed to spawn touch read loop"),
        }

        self.shared.set_connected(true, "device opened");
        self.queue.extend(connected_sequence());
    }
}

impl DisplaySink for Connection {
    fn write_command(&self, color: Color, mode: Mode) {
        Connection::write_command(self, color, mode);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let session = self.shared.link.lock().session;
        self.shared.mark_lost(session, "dropped");
        if let Some(reader) = self.reader.get_mut().take()
            && reader.join().is_err()
        {
            warn!("Touch read loop panicked");
        }
    }
}

/// Blocking read loop for one connection session.
fn read_loop(
    shared: &Shared,
    io: &dyn DeviceIo,
    session: u64,
    shutdown: &ShutdownSignal,
    timeout: Duration,
) {
    debug!(session, "Touch read loop started");
    let mut buf = [0u8; INPUT_REPORT_LEN];

    while !shutdown.is_triggered() && shared.link.lock().session == session {
        match io.read_report(&mut buf, timeout) {
            Ok(0) => {}
            Ok(n) => {
                if let Some(edge) = report::decode_touch(&buf[..n]) {
                    shared.apply_touch(edge);
                }
            }
            Err(e) => {
                warn!(error = %e, "Device read failed");
                shared.mark_lost(session, "read failed");
                break;
            }
        }
    }

    debug!(session, "Touch read loop stopped");
}
