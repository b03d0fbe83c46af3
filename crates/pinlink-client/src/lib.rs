//! Host-side client for driving microcontroller GPIO pins over a serial link.
//!
//! The [`PinLink`] type encodes each operation as a `VMX` command line,
//! writes it to the transport, waits for the single reply line and parses
//! it into a status code or a pin value.
//!
//! # Example
//!
//! ```no_run
//! use pinlink_client::{LinkConfig, PinLink};
//! use pinlink_core::{DigitalLevel, PinMode};
//! use std::time::Duration;
//!
//! # #[cfg(feature = "hardware-serial")]
//! # fn example() -> pinlink_client::Result<()> {
//! let config = LinkConfig::default()
//!     .with_port("/dev/ttyACM0")
//!     .with_baud_rate(9600)
//!     .with_reply_timeout(Duration::from_secs(1));
//!
//! let mut link = PinLink::open(config)?;
//! link.set_pin_mode(13, PinMode::Output)?;
//! link.digital_write(13, DigitalLevel::High)?;
//!
//! let reading = link.analog_read(0)?;
//! println!("A0 = {reading}");
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - Transport failures and malformed replies are returned as [`LinkError`].
//! - Write-class operations return the firmware's [`StatusCode`]; a non-zero
//!   status is not an error at this level.
//! - Read-class operations that receive a status reply log a warning and
//!   return a sentinel. The `try_*` variants return
//!   [`LinkError::Firmware`] instead.
//!
//! [`StatusCode`]: pinlink_core::StatusCode

mod config;
mod error;
mod link;

pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use link::PinLink;
