//! The display controller: reconnect loop plus scheduler on one thread.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use hushlight_core::scheduler::DEFAULT_IDLE_POLL;
use hushlight_core::{
    ColorChoice, Command, CommandQueue, Mode, NotificationMode, Scheduler, ShutdownSignal,
    SignalMode, StatusSnapshot,
};
use tracing::{error, info};

use crate::connection::{Connection, ConnectionConfig};
use crate::device::HidBackend;
use crate::error::HidResult;
use crate::observer::DeviceObserver;

/// Controller settings.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub connection: ConnectionConfig,
    /// Wait between ticks while the queue is empty
    pub idle_poll: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { connection: ConnectionConfig::default(), idle_poll: DEFAULT_IDLE_POLL }
    }
}

struct Inner {
    scheduler: Scheduler,
    connection: Connection,
    shutdown: ShutdownSignal,
}

impl Inner {
    /// One iteration of the reconnect loop.
    fn run_once(&self) {
        if self.connection.probe_and_connect() {
            self.scheduler.tick(&self.connection, &self.shutdown);
        }
    }

    fn run(&self) {
        info!("Display controller started");
        while !self.shutdown.is_triggered() {
            self.run_once();
        }

        info!("Display controller shutting down");
        self.connection.close();
    }
}

/// Handle to the running display controller.
///
/// All command methods are fire-and-forget: they update state or enqueue
/// and return; the device is driven by the controller thread.
pub struct Controller {
    inner: Arc<Inner>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    /// Start the controller thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(
        config: ControllerConfig,
        backend: Arc<dyn HidBackend>,
        observer: Arc<dyn DeviceObserver>,
    ) -> HidResult<Self> {
        let inner = Arc::new(Self::build(config, backend, observer));

        let runner = Arc::clone(&inner);
        let thread = std::thread::Builder::new()
            .name("hushlight-controller".to_string())
            .spawn(move || runner.run())?;

        Ok(Self { inner, thread: Some(thread) })
    }

    fn build(
        config: ControllerConfig,
        backend: Arc<dyn HidBackend>,
        observer: Arc<dyn DeviceObserver>,
    ) -> Inner {
        let shutdown = ShutdownSignal::new();
        let queue = Arc::new(CommandQueue::new());
        Inner {
            scheduler: Scheduler::new(Arc::clone(&queue), config.idle_poll),
            connection: Connection::new(backend, config.connection, queue, observer, shutdown.clone()),
            shutdown,
        }
    }

    /// Apply a parsed external command.
    pub fn apply(&self, command: Command) {
        self.inner.scheduler.apply(command, Instant::now());
    }

    /// Change the steady-state display.
    pub fn set_color_and_mode(&self, color: ColorChoice, mode: Mode) {
        self.inner.scheduler.set_color_and_mode(color, mode);
    }

    /// Flash a two-color burst on top of the steady state.
    pub fn signal(&self, color: ColorChoice, color2: ColorChoice, mode: SignalMode) {
        self.inner.scheduler.signal(color, color2, mode);
    }

    /// Configure the periodic notification overlay.
    pub fn notification(&self, color: ColorChoice, mode: NotificationMode, interval_secs: u32) {
        self.inner.scheduler.set_notification(color, mode, interval_secs, Instant::now());
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connection.is_connected()
    }

    /// Snapshot of the controller state.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        let scheduler = &self.inner.scheduler;
        let notification = scheduler.notification();
        StatusSnapshot {
            connected: self.inner.connection.is_connected(),
            touch: self.inner.connection.touch_state(),
            steady: scheduler.steady_state(),
            queued_commands: scheduler.queue().len(),
            notification_mode: notification.mode,
            notification_color: notification.color,
            notification_interval_secs: notification.interval_secs,
        }
    }

    /// Stop the controller, blank the light and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.inner.shutdown.trigger();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            error!("Display controller thread panicked");
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}
