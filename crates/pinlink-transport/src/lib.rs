//! Serial transport abstraction for the pinlink client.
//!
//! This crate defines the [`Transport`] trait, the capability interface the
//! client uses to reach the microcontroller, together with two
//! implementations:
//!
//! - `SerialTransport`: a real UART link via the `serialport` crate
//!   (feature `hardware-serial`, enabled by default).
//! - [`MockTransport`]: a scripted in-memory transport that records every
//!   call, for tests.
//!
//! # Example
//!
//! Code written against the trait runs unchanged over a serial port or the
//! mock:
//!
//! ```
//! use pinlink_transport::{MockTransport, Transport};
//!
//! fn send_line(port: &mut impl Transport, line: &[u8]) -> pinlink_transport::Result<()> {
//!     port.flush()?;
//!     port.write(line)
//! }
//!
//! # fn main() -> pinlink_transport::Result<()> {
//! let mut mock = MockTransport::new();
//! mock.queue_reply(b"1\n");
//! send_line(&mut mock, b"VMX DIGITALREAD 2")?;
//! assert_eq!(mock.bytes_available()?, 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] with a
//! [`TransportError`]. Errors are fatal for the operation in progress;
//! nothing here retries or reconnects.

pub mod error;
pub mod mock;
#[cfg(feature = "hardware-serial")]
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use mock::{MockTransport, TransportCall};
#[cfg(feature = "hardware-serial")]
pub use serial::SerialTransport;
pub use traits::Transport;
