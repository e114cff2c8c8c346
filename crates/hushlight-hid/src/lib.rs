//! Hushlight HID - presence light hardware integration.
//!
//! This crate owns the USB HID side of the daemon: finding and opening the
//! device, writing command reports, decoding touch events from input
//! reports, and the [`Controller`] thread that ties the connection to the
//! scheduler from `hushlight-core`.

pub mod connection;
pub mod controller;
pub mod device;
pub mod error;
pub mod observer;
pub mod report;

#[cfg(test)]
mod testing;

pub use connection::{Connection, ConnectionConfig};
pub use controller::{Controller, ControllerConfig};
pub use device::{DeviceId, DeviceIo, HidApiBackend, HidBackend, PRODUCT_ID, VENDOR_ID};
pub use error::{HidError, HidResult};
pub use observer::{DeviceObserver, TOUCH_STATE_KEY};
