//! Serial port transport backed by the `serialport` crate.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Timeout for a single blocking read or write on the port.
///
/// Reads only happen after `bytes_available` reported data, so this bounds a
/// misbehaving driver rather than the wait for a reply.
const IO_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial port wrapper for UART communication (8N1, no flow control).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialTransport {
    /// Open a serial port.
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyACM0", "COM3")
    /// * `baud_rate` - Baud rate (e.g., 9600, 115200)
    ///
    /// # Errors
    ///
    /// Returns `TransportError::OpenFailed` if the port cannot be opened.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(IO_TIMEOUT)
            .open()
            .map_err(|e| TransportError::open_failed(path, e.to_string()))?;

        info!("Opened serial port: {} at {} baud", path, baud_rate);

        Ok(Self {
            port,
            name: path.to_string(),
        })
    }

    /// Port path this transport was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured baud rate as reported by the driver.
    pub fn baud_rate(&self) -> Result<u32> {
        Ok(self.port.baud_rate()?)
    }

    /// List serial ports present on the system.
    pub fn available_ports() -> Result<Vec<String>> {
        Ok(serialport::available_ports()?
            .into_iter()
            .map(|p| p.port_name)
            .collect())
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Transport for SerialTransport {
    fn flush(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        debug!("Cleared input buffer on {}", self.name);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        trace!("Wrote {} bytes to {}", bytes.len(), self.name);
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_one(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
