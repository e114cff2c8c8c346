//! Outbound notifications about the device.

/// State key used for touch reports.
pub const TOUCH_STATE_KEY: &str = "touch_state";

/// Receives device state changes.
///
/// Called from the read loop and the controller thread; implementations
/// must return quickly and never block on the consumer.
pub trait DeviceObserver: Send + Sync {
    /// A named state changed value (e.g. `touch_state` -> `Touched`).
    fn state_update(&self, key: &str, value: &str);

    /// The device was opened or lost.
    fn connection_changed(&self, _connected: bool) {}
}
