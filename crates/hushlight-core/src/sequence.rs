//! Display commands and the fixed sequences built from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{Color, Mode, NotificationMode, SignalMode};

/// Hold time for each step of a notification burst.
pub const NOTIFICATION_STEP: Duration = Duration::from_millis(100);
/// Hold time for each step of the connection acknowledgement.
pub const CONNECTED_STEP: Duration = Duration::from_millis(250);

/// One LED state, held for `delay` before the next command is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCommand {
    pub color: Color,
    pub mode: Mode,
    pub delay: Duration,
}

impl DisplayCommand {
    /// Create a new display command.
    #[must_use]
    pub fn new(color: Color, mode: Mode, delay: Duration) -> Self {
        Self { color, mode, delay }
    }

    /// A command that applies immediately and lets the queue continue.
    #[must_use]
    pub fn immediate(color: Color, mode: Mode) -> Self {
        Self::new(color, mode, Duration::ZERO)
    }

    /// A full-brightness flash of `color`.
    #[must_use]
    pub fn flash(color: Color, delay: Duration) -> Self {
        Self::new(color, Mode::FullBright, delay)
    }

    /// LED off, dimmed.
    #[must_use]
    pub fn blank(delay: Duration) -> Self {
        Self::new(Color::NoColor, Mode::Dim, delay)
    }
}

/// Red, green, blue acknowledgement shown after the device is (re)opened.
#[must_use]
pub fn connected_sequence() -> Vec<DisplayCommand> {
    [Color::Red, Color::Green, Color::Blue]
        .into_iter()
        .map(|color| DisplayCommand::flash(color, CONNECTED_STEP))
        .collect()
}

/// Alternating burst between two already-resolved colors.
#[must_use]
pub fn signal_sequence(color: Color, color2: Color, mode: SignalMode) -> Vec<DisplayCommand> {
    let (repetitions, delay) = match mode {
        SignalMode::Fast => (8, Duration::from_millis(100)),
        SignalMode::Slow => (4, Duration::from_millis(250)),
        SignalMode::Once => (1, Duration::from_millis(800)),
    };

    (0..repetitions)
        .flat_map(|_| [DisplayCommand::flash(color, delay), DisplayCommand::flash(color2, delay)])
        .collect()
}

/// Notification burst for `color`, given the current steady-state color.
///
/// When both colors match, a leading blank makes the flash visible. The
/// trailing blank is always present so the fallback re-assert starts from
/// a dark LED. `Off` yields an empty sequence.
#[must_use]
pub fn notification_sequence(
    color: Color,
    mode: NotificationMode,
    steady_color: Color,
) -> Vec<DisplayCommand> {
    let flashes = match mode {
        NotificationMode::Off => return Vec::new(),
        NotificationMode::Once => vec![DisplayCommand::flash(color, NOTIFICATION_STEP)],
        NotificationMode::Twice => vec![
            DisplayCommand::flash(color, NOTIFICATION_STEP),
            DisplayCommand::blank(NOTIFICATION_STEP),
            DisplayCommand::flash(color, NOTIFICATION_STEP),
        ],
    };

    let mut sequence = Vec::with_capacity(flashes.len() + 2);
    if color == steady_color {
        sequence.push(DisplayCommand::blank(NOTIFICATION_STEP));
    }
    sequence.extend(flashes);
    sequence.push(DisplayCommand::blank(NOTIFICATION_STEP));
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_signal_alternates_sixteen_steps() {
        let seq = signal_sequence(Color::Red, Color::Blue, SignalMode::Fast);

        assert_eq!(seq.len(), 16);
        for (i, cmd) in seq.iter().enumerate() {
            let expected = if i % 2 == 0 { Color::Red } else { Color::Blue };
            assert_eq!(cmd.color, expected);
            assert_eq!(cmd.mode, Mode::FullBright);
            assert_eq!(cmd.delay, Duration::from_millis(100));
        }
    }

    #[test]
    fn test_slow_and_once_signals() {
        let slow = signal_sequence(Color::Green, Color::NoColor, SignalMode::Slow);
        assert_eq!(slow.len(), 8);
        assert!(slow.iter().all(|c| c.delay == Duration::from_millis(250)));

        let once = signal_sequence(Color::White, Color::Orange, SignalMode::Once);
        assert_eq!(
            once,
            vec![
                DisplayCommand::flash(Color::White, Duration::from_millis(800)),
                DisplayCommand::flash(Color::Orange, Duration::from_millis(800)),
            ]
        );
    }

    #[test]
    fn test_notification_same_color_is_framed_by_blanks() {
        let seq = notification_sequence(Color::Green, NotificationMode::Once, Color::Green);

        assert_eq!(
            seq,
            vec![
                DisplayCommand::blank(NOTIFICATION_STEP),
                DisplayCommand::flash(Color::Green, NOTIFICATION_STEP),
                DisplayCommand::blank(NOTIFICATION_STEP),
            ]
        );
    }

    #[test]
    fn test_notification_other_color_has_only_trailing_blank() {
        let seq = notification_sequence(Color::Yellow, NotificationMode::Twice, Color::Red);

        assert_eq!(
            seq,
            vec![
                DisplayCommand::flash(Color::Yellow, NOTIFICATION_STEP),
                DisplayCommand::blank(NOTIFICATION_STEP),
                DisplayCommand::flash(Color::Yellow, NOTIFICATION_STEP),
                DisplayCommand::blank(NOTIFICATION_STEP),
            ]
        );
    }

    #[test]
    fn test_notification_off_is_empty() {
        assert!(notification_sequence(Color::Red, NotificationMode::Off, Color::Red).is_empty());
    }

    #[test]
    fn test_connected_sequence_is_rgb() {
        let colors: Vec<_> = connected_sequence().iter().map(|c| c.color).collect();
        assert_eq!(colors, vec![Color::Red, Color::Green, Color::Blue]);
    }
}
