//! Forwards device state changes to IPC clients.

use hushlight_hid::DeviceObserver;
use hushlight_ipc::Event;
use tokio::sync::broadcast;
use tracing::debug;

/// Observer that broadcasts device changes as IPC events.
pub struct BroadcastObserver {
    event_tx: broadcast::Sender<Event>,
}

impl BroadcastObserver {
    #[must_use]
    pub fn new(event_tx: broadcast::Sender<Event>) -> Self {
        Self { event_tx }
    }

    fn publish(&self, event: Event) {
        // No subscribers is not an error: nobody is listening yet.
        if self.event_tx.send(event).is_err() {
            debug!("No IPC clients for device event");
        }
    }
}

impl DeviceObserver for BroadcastObserver {
    fn state_update(&self, key: &str, value: &str) {
        self.publish(Event::state_update(key, value));
    }

    fn connection_changed(&self, connected: bool) {
        self.publish(Event::connection(connected));
    }
}
