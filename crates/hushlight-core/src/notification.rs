//! Periodic notification overlay configuration.

use std::time::{Duration, Instant};

use crate::color::{Color, NotificationMode};

/// Delay between (re)configuring a notification and its first firing.
pub const ARM_DELAY: Duration = Duration::from_secs(1);

/// Notification overlay settings plus the time of the next firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    pub color: Color,
    pub mode: NotificationMode,
    pub interval_secs: u32,
    pub next_trigger: Instant,
}

impl NotificationConfig {
    /// Disabled overlay.
    #[must_use]
    pub fn off(now: Instant) -> Self {
        Self { color: Color::NoColor, mode: NotificationMode::Off, interval_secs: 0, next_trigger: now }
    }

    /// A fresh configuration, armed one second after `now`.
    #[must_use]
    pub fn armed(color: Color, mode: NotificationMode, interval_secs: u32, now: Instant) -> Self {
        Self { color, mode, interval_secs, next_trigger: now + ARM_DELAY }
    }

    /// Whether the overlay should fire at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.mode != NotificationMode::Off && now > self.next_trigger
    }

    /// Schedule the next firing one interval after `now`.
    pub fn rearm(&mut self, now: Instant) {
        self.next_trigger = now + Duration::from_secs(u64::from(self.interval_secs));
    }
}
