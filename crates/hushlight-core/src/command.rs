//! Parsed external commands.
//!
//! The command endpoint receives loosely formatted strings; everything is
//! validated here before any state is touched.

use serde::{Deserialize, Serialize};

use crate::color::{ColorChoice, Mode, NotificationMode, SignalMode};
use crate::error::{CoreError, Result};

/// A validated request for the display controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Replace the steady-state display
    SetColorAndMode { color: ColorChoice, mode: Mode },
    /// Flash an alternating two-color burst
    Signal { color: ColorChoice, color2: ColorChoice, mode: SignalMode },
    /// Configure the periodic notification overlay
    Notification { color: ColorChoice, mode: NotificationMode, interval_secs: u32 },
}

impl Command {
    /// Parse a steady-state change.
    ///
    /// # Errors
    /// Returns an error if the color or mode is not recognised.
    pub fn set_color_and_mode(color: &str, mode: &str) -> Result<Self> {
        Ok(Self::SetColorAndMode { color: color.parse()?, mode: mode.parse()? })
    }

    /// Parse a signal burst.
    ///
    /// # Errors
    /// Returns an error if either color or the signal mode is not recognised.
    pub fn signal(color: &str, color2: &str, mode: &str) -> Result<Self> {
        Ok(Self::Signal { color: color.parse()?, color2: color2.parse()?, mode: mode.parse()? })
    }

    /// Parse a notification configuration.
    ///
    /// # Errors
    /// Returns an error if the color, mode, or interval is not valid.
    pub fn notification(color: &str, mode: &str, interval: &str) -> Result<Self> {
        let trimmed: String = interval.chars().filter(|c| !c.is_whitespace()).collect();
        let interval_secs =
            trimmed.parse::<u32>().map_err(|_| CoreError::InvalidInterval(interval.to_string()))?;

        Ok(Self::Notification { color: color.parse()?, mode: mode.parse()?, interval_secs })
    }
}
