//! Error types for transport operations.
//!
//! Transport failures are fatal for the operation in progress. The client
//! propagates them unchanged and never attempts to reconnect.

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while moving bytes over the link.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// A read was attempted with nothing buffered.
    #[error("No data available on {device}")]
    NoData { device: String },

    /// Port could not be opened or configured.
    #[error("Failed to open {port}: {message}")]
    OpenFailed { port: String, message: String },

    /// Error reported by the serial port driver.
    #[cfg(feature = "hardware-serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new no-data error.
    pub fn no_data(device: impl Into<String>) -> Self {
        Self::NoData {
            device: device.into(),
        }
    }

    /// Create a new open failed error.
    pub fn open_failed(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            port: port.into(),
            message: message.into(),
        }
    }
}
