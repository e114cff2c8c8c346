//! Colors, brightness modes, and the signal/notification pattern kinds.
//!
//! The device takes a single command byte formed by adding a [`Color`] code
//! and a [`Mode`] code, so both enums carry their wire value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An LED color the device can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// LED off
    #[default]
    NoColor,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    White,
    /// Undocumented by the vendor, but supported by the firmware
    Orange,
}

impl Color {
    /// All displayable colors, in wire order.
    pub const ALL: [Self; 9] = [
        Self::NoColor,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Purple,
        Self::Cyan,
        Self::White,
        Self::Orange,
    ];

    /// Wire value of this color.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::NoColor => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Purple => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::Orange => 8,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NoColor => "NoColor",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::Cyan => "Cyan",
            Self::White => "White",
            Self::Orange => "Orange",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color as requested by a caller.
///
/// `Current` stands for whatever the steady-state color is at the moment the
/// request is accepted. It is resolved before anything reaches the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    /// A concrete color
    Fixed(Color),
    /// The steady-state color at request time
    Current,
}

impl ColorChoice {
    /// Resolve against the given steady-state color.
    #[must_use]
    pub fn resolve(self, current: Color) -> Color {
        match self {
            Self::Fixed(color) => color,
            Self::Current => current,
        }
    }
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        Self::Fixed(color)
    }
}

impl FromStr for ColorChoice {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = match normalize(s).as_str() {
            "nocolor" | "off" => Color::NoColor,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "orange" => Color::Orange,
            "currentcolor" | "current" => return Ok(Self::Current),
            _ => return Err(CoreError::InvalidColor(s.to_string())),
        };
        Ok(Self::Fixed(color))
    }
}

/// Brightness / animation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    FullBright,
    Dim,
    FastPulse,
    SlowPulse,
}

impl Mode {
    /// All modes, in wire order.
    pub const ALL: [Self; 4] = [Self::FullBright, Self::Dim, Self::FastPulse, Self::SlowPulse];

    /// Wire offset added to the color code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::FullBright => 0,
            Self::Dim => 16,
            Self::FastPulse => 32,
            Self::SlowPulse => 48,
        }
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fullbright" | "bright" => Ok(Self::FullBright),
            "dim" => Ok(Self::Dim),
            "fastpulse" => Ok(Self::FastPulse),
            "slowpulse" => Ok(Self::SlowPulse),
            _ => Err(CoreError::InvalidMode(s.to_string())),
        }
    }
}

/// Compute the single device command byte for a color and mode.
#[must_use]
pub fn command_code(color: Color, mode: Mode) -> u8 {
    color.code() + mode.code()
}

/// Alternating two-color burst pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// 8 pairs of 100ms flashes
    Fast,
    /// 4 pairs of 250ms flashes
    Slow,
    /// One 800ms flash of each color
    Once,
}

impl FromStr for SignalMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fast" => Ok(Self::Fast),
            "slow" => Ok(Self::Slow),
            "once" => Ok(Self::Once),
            _ => Err(CoreError::InvalidSignalMode(s.to_string())),
        }
    }
}

/// Periodic notification blink pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMode {
    #[default]
    Off,
    /// One flash per interval
    Once,
    /// Two flashes per interval
    Twice,
}

impl FromStr for NotificationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "off" => Ok(Self::Off),
            "once" => Ok(Self::Once),
            "twice" => Ok(Self::Twice),
            _ => Err(CoreError::InvalidNotificationMode(s.to_string())),
        }
    }
}

/// Drop whitespace and separators, lowercase the rest ("No Color" -> "nocolor").
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn test_command_code_is_additive() {
        assert_eq!(command_code(Color::NoColor, Mode::FullBright), 0);
        assert_eq!(command_code(Color::Red, Mode::Dim), 17);
        assert_eq!(command_code(Color::Blue, Mode::FastPulse), 36);
        assert_eq!(command_code(Color::Orange, Mode::SlowPulse), 56);
    }

    #[test]
    fn test_parse_colors_leniently() {
        assert_eq!("No Color".parse::<ColorChoice>(), Ok(ColorChoice::Fixed(Color::NoColor)));
        assert_eq!("red".parse::<ColorChoice>(), Ok(ColorChoice::Fixed(Color::Red)));
        assert_eq!(" Purple ".parse::<ColorChoice>(), Ok(ColorChoice::Fixed(Color::Purple)));
        assert_eq!("Current Color".parse::<ColorChoice>(), Ok(ColorChoice::Current));
        assert_matches!("magenta".parse::<ColorChoice>(), Err(CoreError::InvalidColor(_)));
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("Full Bright".parse::<Mode>(), Ok(Mode::FullBright));
        assert_eq!("slow_pulse".parse::<Mode>(), Ok(Mode::SlowPulse));
        assert_matches!("strobe".parse::<Mode>(), Err(CoreError::InvalidMode(_)));
        assert_eq!("Twice".parse::<NotificationMode>(), Ok(NotificationMode::Twice));
        assert_eq!("FAST".parse::<SignalMode>(), Ok(SignalMode::Fast));
        assert_matches!("".parse::<SignalMode>(), Err(CoreError::InvalidSignalMode(_)));
    }

    #[test]
    fn test_current_resolves_to_steady_color() {
        assert_eq!(ColorChoice::Current.resolve(Color::Cyan), Color::Cyan);
        assert_eq!(ColorChoice::Fixed(Color::Red).resolve(Color::Cyan), Color::Red);
    }

    proptest! {
        #[test]
        fn prop_command_code_splits_back(color_idx in 0usize..9, mode_idx in 0usize..4) {
            let color = Color::ALL[color_idx];
            let mode = Mode::ALL[mode_idx];
            let code = command_code(color, mode);
            prop_assert_eq!(code & 0x0f, color.code());
            prop_assert_eq!(code & 0xf0, mode.code());
        }

        #[test]
        fn prop_color_names_parse_back(color_idx in 0usize..9) {
            let color = Color::ALL[color_idx];
            prop_assert_eq!(color.name().parse::<ColorChoice>(), Ok(ColorChoice::Fixed(color)));
        }
    }
}
