//! Request handling for the IPC server.

use serde_json::{Value, json};
use tracing::{debug, error, info};

use hushlight_core::{Command, StatusSnapshot};
use hushlight_ipc::{ErrorInfo, Method};

/// Error code for commands whose parameters fail validation.
pub const INVALID_COMMAND: i32 = ErrorInfo::BAD_REQUEST;

/// What the main loop must do after answering a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward a validated command to the controller
    Apply(Command),
    /// Stop the daemon
    Shutdown,
}

/// Outcome of handling one request.
#[derive(Debug)]
pub struct HandleResult {
    pub response: Result<Value, ErrorInfo>,
    pub action: Option<Action>,
}

/// Handle an IPC request against the current controller status.
pub fn handle_request(method: &Method, status: &StatusSnapshot) -> HandleResult {
    match method {
        Method::GetStatus => HandleResult {
            response: Ok(serde_json::to_value(status).unwrap_or(json!({}))),
            action: None,
        },

        Method::Shutdown => {
            info!("Shutdown requested via IPC");
            HandleResult { response: Ok(json!({"success": true})), action: Some(Action::Shutdown) }
        }

        Method::SetColorAndMode { .. } | Method::Signal { .. } | Method::Notification { .. } => {
            match method.to_command() {
                Some(Ok(command)) => {
                    debug!(?command, "Accepted command");
                    HandleResult {
                        response: Ok(json!({"success": true})),
                        action: Some(Action::Apply(command)),
                    }
                }
                Some(Err(e)) => {
                    error!(error = %e, ?method, "Rejected command");
                    HandleResult {
                        response: Err(ErrorInfo::new(INVALID_COMMAND, e.to_string())),
                        action: None,
                    }
                }
                None => unreachable!("display methods always parse to a command"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hushlight_core::{Color, ColorChoice, Mode, NotificationMode, SteadyState, TouchState};

    use super::*;

    fn status() -> StatusSnapshot {
        StatusSnapshot {
            connected: true,
            touch: TouchState::Untouched,
            steady: SteadyState::default(),
            queued_commands: 0,
            notification_mode: NotificationMode::Off,
            notification_color: Color::NoColor,
            notification_interval_secs: 0,
        }
    }

    #[test]
    fn test_valid_command_is_forwarded() {
        let method = Method::SetColorAndMode { color: "current color".into(), mode: "fast_pulse".into() };
        let result = handle_request(&method, &status());

        assert!(result.response.is_ok());
        assert_eq!(
            result.action,
            Some(Action::Apply(Command::SetColorAndMode {
                color: ColorChoice::Current,
                mode: Mode::FastPulse,
            }))
        );
    }

    #[test]
    fn test_malformed_command_is_rejected_without_action() {
        let method = Method::SetColorAndMode { color: "Magenta".into(), mode: "Dim".into() };
        let result = handle_request(&method, &status());

        assert_matches!(
            result.response,
            Err(ErrorInfo { code: INVALID_COMMAND, ref message }) if message.contains("color") && message.contains("Magenta")
        );
        assert!(result.action.is_none());

        let method = Method::Signal {
            color: "Red".into(),
            color2: "Blue".into(),
            signal_mode: "Strobe".into(),
        };
        let result = handle_request(&method, &status());
        assert_matches!(
            result.response,
            Err(ErrorInfo { code: INVALID_COMMAND, ref message }) if message.contains("signal mode")
        );
        assert!(result.action.is_none());
    }

    #[test]
    fn test_status_and_shutdown() {
        let result = handle_request(&Method::GetStatus, &status());
        let value = result.response.expect("status serializes");
        assert_eq!(value["connected"], true);
        assert!(result.action.is_none());

        let result = handle_request(&Method::Shutdown, &status());
        assert_eq!(result.action, Some(Action::Shutdown));
    }
}
