//! Command scheduling: queue draining, steady-state fallback, and the
//! notification overlay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::color::{Color, ColorChoice, Mode, NotificationMode, SignalMode};
use crate::command::Command;
use crate::notification::NotificationConfig;
use crate::queue::CommandQueue;
use crate::sequence::{DisplayCommand, notification_sequence, signal_sequence};
use crate::shutdown::ShutdownSignal;
use crate::state::SteadyState;

/// Default wait when the queue is empty.
pub const DEFAULT_IDLE_POLL: Duration = Duration::from_millis(250);

/// Something that can put a color on the device.
pub trait DisplaySink {
    /// Apply a color and mode. Failures are handled by the sink.
    fn write_command(&self, color: Color, mode: Mode);
}

/// Turns queued commands, the steady state, and the notification overlay
/// into a paced stream of device writes.
pub struct Scheduler {
    queue: Arc<CommandQueue>,
    steady: Mutex<SteadyState>,
    notification: Mutex<NotificationConfig>,
    /// Set while queued commands are being drained, cleared by the
    /// steady-state re-assert once the queue runs dry.
    sequence_active: AtomicBool,
    idle_poll: Duration,
}

impl Scheduler {
    /// Create a scheduler draining `queue`.
    #[must_use]
    pub fn new(queue: Arc<CommandQueue>, idle_poll: Duration) -> Self {
        Self {
            queue,
            steady: Mutex::new(SteadyState::default()),
            notification: Mutex::new(NotificationConfig::off(Instant::now())),
            sequence_active: AtomicBool::new(false),
            idle_poll,
        }
    }

    /// The queue this scheduler drains.
    #[must_use]
    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }

    #[must_use]
    pub fn steady_state(&self) -> SteadyState {
        *self.steady.lock()
    }

    #[must_use]
    pub fn notification(&self) -> NotificationConfig {
        *self.notification.lock()
    }

    /// Apply a parsed external command.
    pub fn apply(&self, command: Command, now: Instant) {
        match command {
            Command::SetColorAndMode { color, mode } => {
                self.set_color_and_mode(color, mode);
            }
            Command::Signal { color, color2, mode } => self.signal(color, color2, mode),
            Command::Notification { color, mode, interval_secs } => {
                self.set_notification(color, mode, interval_secs, now);
            }
        }
    }

    /// Replace the steady state and apply it immediately.
    ///
    /// `ColorChoice::Current` keeps the current color and only changes the mode.
    pub fn set_color_and_mode(&self, color: ColorChoice, mode: Mode) -> SteadyState {
        let mut steady = self.steady.lock();
        let color = color.resolve(steady.color);
        *steady = SteadyState { color, mode };
        // Enqueue under the steady lock so the last write always matches the fallback.
        self.queue.push(DisplayCommand::immediate(color, mode));
        info!(%color, ?mode, "Steady state changed");
        *steady
    }

    /// Queue an alternating burst. The steady state is left untouched.
    pub fn signal(&self, color: ColorChoice, color2: ColorChoice, mode: SignalMode) {
        let current = self.steady.lock().color;
        let color = color.resolve(current);
        let color2 = color2.resolve(current);

        let sequence = signal_sequence(color, color2, mode);
        debug!(%color, %color2, ?mode, steps = sequence.len(), "Signal queued");
        self.queue.extend(sequence);
    }

    /// Replace the notification overlay, armed one second after `now`.
    pub fn set_notification(
        &self,
        color: ColorChoice,
        mode: NotificationMode,
        interval_secs: u32,
        now: Instant,
    ) {
        let color = color.resolve(self.steady.lock().color);
        *self.notification.lock() = NotificationConfig::armed(color, mode, interval_secs, now);
        info!(%color, ?mode, interval_secs, "Notification configured");
    }

    /// Write the next command, or re-assert the steady state once after a
    /// sequence ends. Returns how long to hold before the next tick.
    pub fn next_step(&self, sink: &dyn DisplaySink) -> Duration {
        if let Some(command) = self.queue.pop() {
            self.sequence_active.store(true, Ordering::SeqCst);
            sink.write_command(command.color, command.mode);
            return command.delay;
        }

        if self.sequence_active.swap(false, Ordering::SeqCst) {
            let steady = self.steady_state();
            debug!(color = %steady.color, mode = ?steady.mode, "Sequence finished, restoring steady state");
            sink.write_command(steady.color, steady.mode);
        }

        self.idle_poll
    }

    /// Queue a notification burst if one is due at `now`. Returns the number
    /// of commands queued.
    ///
    /// A due burst is not appended behind pending commands: it waits until
    /// the queue has drained and the steady state has been re-asserted, so it
    /// may fire later than `next_trigger` and always follows a steady-state
    /// write. The next interval is measured from the actual firing.
    pub fn poll_notification(&self, now: Instant) -> usize {
        let mut config = self.notification.lock();
        if !config.is_due(now) {
            return 0;
        }
        if !self.queue.is_empty() || self.sequence_active.load(Ordering::SeqCst) {
            return 0;
        }

        let sequence = notification_sequence(config.color, config.mode, self.steady.lock().color);
        let queued = sequence.len();
        self.queue.extend(sequence);
        config.rearm(now);
        debug!(color = %config.color, mode = ?config.mode, queued, "Notification fired");
        queued
    }

    /// Run one scheduler tick: write, hold (interruptible), then evaluate
    /// the notification overlay.
    pub fn tick(&self, sink: &dyn DisplaySink, shutdown: &ShutdownSignal) {
        let hold = self.next_step(sink);
        if shutdown.wait_timeout(hold) {
            return;
        }
        self.poll_notification(Instant::now());
    }
}
