//! IPC event types (server to client).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event pushed from the daemon to every connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event type
    pub event: EventType,
    /// Event data
    pub data: Value,
}

impl Event {
    /// A named device state changed value.
    #[must_use]
    pub fn state_update(key: &str, value: &str) -> Self {
        Self {
            event: EventType::StateUpdate,
            data: serde_json::to_value(StateUpdateData { key: key.to_string(), value: value.to_string() })
                .unwrap_or_default(),
        }
    }

    /// The device was opened or lost.
    #[must_use]
    pub fn connection(connected: bool) -> Self {
        let event =
            if connected { EventType::DeviceConnected } else { EventType::DeviceDisconnected };
        Self { event, data: serde_json::json!({}) }
    }
}

/// Types of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Device state changed (touch)
    StateUpdate,
    /// Presence light opened
    DeviceConnected,
    /// Presence light lost or closed
    DeviceDisconnected,
}

/// State update event data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdateData {
    pub key: String,
    pub value: String,
}
