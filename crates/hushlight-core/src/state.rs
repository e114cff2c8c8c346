//! Steady-state display, touch state, and the status snapshot.

use serde::{Deserialize, Serialize};

use crate::color::{Color, Mode, NotificationMode};

/// The display the device holds whenever no transient sequence is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteadyState {
    pub color: Color,
    pub mode: Mode,
}

impl Default for SteadyState {
    fn default() -> Self {
        Self { color: Color::NoColor, mode: Mode::Dim }
    }
}

/// Whether the button is currently being touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TouchState {
    Touched,
    #[default]
    Untouched,
}

impl TouchState {
    /// Value reported to observers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Touched => "Touched",
            Self::Untouched => "Untouched",
        }
    }

    /// Apply an edge. Returns the new state only if it actually changed.
    #[must_use]
    pub fn apply(self, edge: TouchEdge) -> Option<Self> {
        match (self, edge) {
            (Self::Untouched, TouchEdge::Down) => Some(Self::Touched),
            (Self::Touched, TouchEdge::Up) => Some(Self::Untouched),
            _ => None,
        }
    }
}

/// Touch transition decoded from an input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEdge {
    Down,
    Up,
}

/// Point-in-time view of the controller, served to status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the device is open and writable
    pub connected: bool,
    /// Last decoded touch state
    pub touch: TouchState,
    /// Current steady-state display
    pub steady: SteadyState,
    /// Commands waiting in the queue
    pub queued_commands: usize,
    /// Active notification overlay
    pub notification_mode: NotificationMode,
    pub notification_color: Color,
    pub notification_interval_secs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_is_edge_triggered() {
        let state = TouchState::Untouched;
        assert_eq!(state.apply(TouchEdge::Up), None);

        let state = state.apply(TouchEdge::Down).expect("touch-down edge");
        assert_eq!(state, TouchState::Touched);
        assert_eq!(state.apply(TouchEdge::Down), None);
        assert_eq!(state.apply(TouchEdge::Up), Some(TouchState::Untouched));
    }

    #[test]
    fn test_default_steady_state_is_dark() {
        assert_eq!(SteadyState::default(), SteadyState { color: Color::NoColor, mode: Mode::Dim });
    }
}
