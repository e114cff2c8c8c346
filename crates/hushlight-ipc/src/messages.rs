//! IPC message types.

use hushlight_core::{Command, CoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request envelope sent from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique request ID for matching responses
    pub id: u64,
    /// The method to invoke
    pub method: Method,
}

/// Response envelope sent from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Request ID this is responding to
    pub id: u64,
    /// Result of the request
    pub result: Result<Value, ErrorInfo>,
}

/// Error information in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
}

impl ErrorInfo {
    /// Code for requests that are malformed or carry invalid parameters.
    pub const BAD_REQUEST: i32 = 400;

    /// Create a new error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Methods that can be invoked via IPC.
///
/// Display parameters arrive as free-form strings ("No Color", "full bright")
/// and are validated by [`Method::to_command`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Method {
    /// Set the steady-state color and mode
    SetColorAndMode { color: String, mode: String },
    /// Flash an alternating two-color burst
    Signal { color: String, color2: String, signal_mode: String },
    /// Configure the notification overlay; `interval` is seconds, as a
    /// number or a string
    Notification { color: String, mode: String, interval: Value },
    /// Get controller status
    GetStatus,
    /// Request graceful shutdown
    Shutdown,
}

impl Method {
    /// Parse a display method into a controller command.
    ///
    /// Returns `None` for methods that are not display commands.
    ///
    /// # Errors
    /// Returns an error if any parameter fails validation.
    pub fn to_command(&self) -> Option<Result<Command, CoreError>> {
        match self {
            Self::SetColorAndMode { color, mode } => Some(Command::set_color_and_mode(color, mode)),
            Self::Signal { color, color2, signal_mode } => {
                Some(Command::signal(color, color2, signal_mode))
            }
            Self::Notification { color, mode, interval } => {
                let interval = match interval {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(Command::notification(color, mode, &interval))
            }
            Self::GetStatus | Self::Shutdown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hushlight_core::{Color, ColorChoice, NotificationMode};

    #[test]
    fn test_method_wire_format() {
        let request: Request = serde_json::from_str(
            r#"{"id":7,"method":{"type":"SetColorAndMode","params":{"color":"No Color","mode":"Dim"}}}"#,
        )
        .expect("request parses");

        assert_eq!(request.id, 7);
        assert_matches!(request.method, Method::SetColorAndMode { ref color, .. } if color == "No Color");
    }

    #[test]
    fn test_notification_interval_accepts_number_or_string() {
        for interval in [serde_json::json!(30), serde_json::json!("30")] {
            let method = Method::Notification {
                color: "Green".into(),
                mode: "Once".into(),
                interval,
            };
            assert_eq!(
                method.to_command(),
                Some(Ok(Command::Notification {
                    color: ColorChoice::Fixed(Color::Green),
                    mode: NotificationMode::Once,
                    interval_secs: 30,
                }))
            );
        }
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let method = Method::Signal {
            color: "Red".into(),
            color2: "Blue".into(),
            signal_mode: "Strobe".into(),
        };
        assert_matches!(method.to_command(), Some(Err(CoreError::InvalidSignalMode(_))));
        assert!(Method::GetStatus.to_command().is_none());
    }
}
