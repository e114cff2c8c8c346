//! Presence light detection and raw report I/O.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{HidError, HidResult};

/// Presence light USB Vendor ID
pub const VENDOR_ID: u16 = 8352;
/// Presence light USB Product ID
pub const PRODUCT_ID: u16 = 17114;

/// USB vendor/product pair identifying the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl Default for DeviceId {
    fn default() -> Self {
        Self { vendor_id: VENDOR_ID, product_id: PRODUCT_ID }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// An opened device.
///
/// Writes and reads may happen concurrently from different threads.
pub trait DeviceIo: Send + Sync {
    /// Send an output report.
    ///
    /// # Errors
    /// Returns an error if the device rejects the write or is gone.
    fn write_report(&self, report: &[u8]) -> HidResult<usize>;

    /// Wait up to `timeout` for an input report. `Ok(0)` means nothing arrived.
    ///
    /// # Errors
    /// Returns an error if the device is gone.
    fn read_report(&self, buf: &mut [u8], timeout: Duration) -> HidResult<usize>;
}

/// Enumerates and opens devices.
pub trait HidBackend: Send + Sync {
    /// Whether a matching device is currently plugged in.
    ///
    /// # Errors
    /// Returns an error if enumeration itself fails.
    fn is_present(&self, id: DeviceId) -> HidResult<bool>;

    /// Open the matching device.
    ///
    /// # Errors
    /// Returns an error if the device is absent or cannot be opened.
    fn open(&self, id: DeviceId) -> HidResult<Arc<dyn DeviceIo>>;
}

/// [`HidBackend`] on top of `hidapi`.
pub struct HidApiBackend {
    api: Mutex<HidApi>,
}

impl HidApiBackend {
    /// Initialise the HID library.
    ///
    /// # Errors
    /// Returns an error if `hidapi` cannot be initialised.
    pub fn new() -> HidResult<Self> {
        Ok(Self { api: Mutex::new(HidApi::new()?) })
    }
}

impl HidBackend for HidApiBackend {
    fn is_present(&self, id: DeviceId) -> HidResult<bool> {
        let mut api = self.api.lock();
        api.refresh_devices()?;

        let present = api
            .device_list()
            .any(|d| d.vendor_id() == id.vendor_id && d.product_id() == id.product_id);
        debug!(device = %id, present, "Enumerated HID devices");
        Ok(present)
    }

    fn open(&self, id: DeviceId) -> HidResult<Arc<dyn DeviceIo>> {
        let api = self.api.lock();
        let info = api
            .device_list()
            .find(|d| d.vendor_id() == id.vendor_id && d.product_id() == id.product_id)
            .ok_or(HidError::DeviceNotFound)?;

        // hidraw accepts several handles per node: one for writes, one for blocking reads.
        let writer = api.open_path(info.path()).map_err(|e| HidError::OpenFailed(e.to_string()))?;
        let reader = api.open_path(info.path()).map_err(|e| HidError::OpenFailed(e.to_string()))?;

        info!(
            device = %id,
            path = %info.path().to_string_lossy(),
            serial = info.serial_number().unwrap_or("unknown"),
            "Presence light opened"
        );

        Ok(Arc::new(HidApiDevice { writer: Mutex::new(writer), reader: Mutex::new(reader) }))
    }
}

struct HidApiDevice {
    writer: Mutex<HidDevice>,
    reader: Mutex<HidDevice>,
}

impl DeviceIo for HidApiDevice {
    fn write_report(&self, report: &[u8]) -> HidResult<usize> {
        self.writer.lock().write(report).map_err(|e| HidError::WriteFailed(e.to_string()))
    }

    fn read_report(&self, buf: &mut [u8], timeout: Duration) -> HidResult<usize> {
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        self.reader
            .lock()
            .read_timeout(buf, timeout_ms)
            .map_err(|e| HidError::ReadFailed(e.to_string()))
    }
}
