//! Wire format of the presence light's HID reports.
//!
//! Output reports are two bytes: report id `0x00` followed by the command
//! byte (`color + mode`). Input reports are eight bytes and only byte 4
//! carries information.

use hushlight_core::{Color, Mode, TouchEdge, command_code};

/// Length of an output report.
pub const OUTPUT_REPORT_LEN: usize = 2;
/// Length of an input report.
pub const INPUT_REPORT_LEN: usize = 8;
/// Offset of the touch byte inside an input report.
pub const TOUCH_OFFSET: usize = 4;

const TOUCH_DOWN: u8 = 1;
const TOUCH_UP: u8 = 2;

/// Build the output report for a color and mode.
#[must_use]
pub fn output_report(color: Color, mode: Mode) -> [u8; OUTPUT_REPORT_LEN] {
    [0x00, command_code(color, mode)]
}

/// Decode the touch edge carried by an input report, if any.
#[must_use]
pub fn decode_touch(report: &[u8]) -> Option<TouchEdge> {
    match *report.get(TOUCH_OFFSET)? {
        TOUCH_DOWN => Some(TouchEdge::Down),
        TOUCH_UP => Some(TouchEdge::Up),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_report_layout() {
        assert_eq!(output_report(Color::NoColor, Mode::Dim), [0x00, 16]);
        assert_eq!(output_report(Color::Green, Mode::SlowPulse), [0x00, 50]);
    }

    #[test]
    fn test_decode_touch_byte() {
        assert_eq!(decode_touch(&[0, 0, 0, 0, 1, 0, 0, 0]), Some(TouchEdge::Down));
        assert_eq!(decode_touch(&[0, 0, 0, 0, 2, 0, 0, 0]), Some(TouchEdge::Up));
        assert_eq!(decode_touch(&[0, 0, 0, 0, 4, 0, 0, 0]), None);
        assert_eq!(decode_touch(&[9, 9, 9, 9, 0, 9, 9, 9]), None);
    }

    #[test]
    fn test_decode_short_report_is_ignored() {
        assert_eq!(decode_touch(&[1, 1, 1, 1]), None);
        assert_eq!(decode_touch(&[]), None);
    }
}
