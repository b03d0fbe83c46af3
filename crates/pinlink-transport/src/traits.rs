//! Transport trait definition.
//!
//! The [`Transport`] trait is the only way the client touches the wire. It
//! is deliberately small so that a real serial port, a scripted mock and an
//! in-process board emulator can all stand behind it.

use crate::error::Result;

/// Byte-level serial transport.
///
/// # Contract
///
/// - [`flush`](Transport::flush) discards every byte currently buffered for
///   reading. It does not touch bytes that arrive afterwards.
/// - [`write`](Transport::write) transmits the bytes in order, blocking as
///   the device requires, and appends no framing.
/// - [`bytes_available`](Transport::bytes_available) never blocks.
/// - [`read_one`](Transport::read_one) is only called after
///   `bytes_available` reported at least one byte.
///
/// Any error is fatal for the operation in progress.
///
/// # Object Safety
///
/// The trait is synchronous and object-safe, so `Box<dyn Transport>` works
/// where the concrete transport is chosen at runtime:
///
/// ```
/// use pinlink_transport::{MockTransport, Transport};
///
/// let mut transport: Box<dyn Transport> = Box::new(MockTransport::new());
/// transport.flush().unwrap();
/// assert_eq!(transport.bytes_available().unwrap(), 0);
/// ```
pub trait Transport {
    /// Discard any bytes buffered for reading.
    fn flush(&mut self) -> Result<()>;

    /// Transmit `bytes` in order.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Number of received-but-unread bytes.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Next buffered byte.
    fn read_one(&mut self) -> Result<u8>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_one(&mut self) -> Result<u8> {
        (**self).read_one()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_one(&mut self) -> Result<u8> {
        (**self).read_one()
    }
}
