//! HID error types.

use thiserror::Error;

/// HID error type.
#[derive(Debug, Error)]
pub enum HidError {
    #[error("Device not found")]
    DeviceNotFound,

    #[error("Could not open device: {0}")]
    OpenFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("HID API error: {0}")]
    Api(#[from] hidapi::HidError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for HID operations.
pub type HidResult<T> = Result<T, HidError>;
