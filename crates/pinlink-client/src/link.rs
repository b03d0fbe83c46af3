//! Operation dispatcher.
//!
//! Every public operation follows the same recipe:
//!
//! ```text
//! IDLE ─flush─> FLUSHED ─write─> WRITTEN ─poll─> AWAITING_REPLY ─'\n'─> PARSED ─> IDLE
//! ```
//!
//! 1. Flush the transport's receive buffer.
//! 2. Encode and write the command line.
//! 3. Poll until the reply's `\n` has been read.
//! 4. Parse the reply for the operation's shape.
//! 5. Return the result.
//!
//! No intermediate state survives a call. Nothing is retried: a transport
//! error, a parse error or a timeout ends the call and the next call's
//! flush discards whatever is left on the wire.

use std::thread;
use std::time::Instant;

use pinlink_core::{DigitalLevel, Pin, PinMode, StatusCode};
use pinlink_protocol::{Command, LineReader, Reply};
use pinlink_transport::Transport;
use tracing::{debug, trace, warn};

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};

/// Link to a microcontroller running the VMX pin firmware.
///
/// The link owns its transport for its whole lifetime. All operations take
/// `&mut self`, so at most one request is ever in flight; sharing a link
/// across threads requires external locking (e.g. `Mutex<PinLink<_>>`).
///
/// # Example
///
/// ```
/// use pinlink_client::PinLink;
/// use pinlink_core::{DigitalLevel, PinMode};
/// use pinlink_transport::MockTransport;
///
/// # fn main() -> pinlink_client::Result<()> {
/// let mut mock = MockTransport::new();
/// mock.queue_reply(b"code 0\n").queue_reply(b"1\n");
///
/// let mut link = PinLink::new(mock);
/// assert!(link.set_pin_mode(7, PinMode::Input)?.is_success());
/// assert_eq!(link.digital_read(7)?, DigitalLevel::High);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PinLink<T: Transport> {
    transport: T,
    config: LinkConfig,
    reader: LineReader,
}

#[cfg(feature = "hardware-serial")]
impl PinLink<pinlink_transport::SerialTransport> {
    /// Open the serial port named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Protocol` for an invalid configuration and
    /// `LinkError::Transport` if the port cannot be opened.
    pub fn open(config: LinkConfig) -> Result<Self> {
        config.validate()?;
        let transport = pinlink_transport::SerialTransport::open(&config.port, config.baud_rate)?;
        Self::with_config(transport, config)
    }

    /// Open `port` at `baud_rate` with otherwise default settings.
    pub fn open_port(port: &str, baud_rate: u32) -> Result<Self> {
        Self::open(
            LinkConfig::default()
                .with_port(port)
                .with_baud_rate(baud_rate),
        )
    }
}

impl<T: Transport> PinLink<T> {
    /// Create a link over `transport` with the default configuration.
    pub fn new(transport: T) -> Self {
        let config = LinkConfig::default();
        Self {
            reader: LineReader::with_max_len(config.max_reply_len),
            transport,
            config,
        }
    }

    /// Create a link over `transport` with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Protocol` if the configuration fails validation.
    pub fn with_config(transport: T, config: LinkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader: LineReader::with_max_len(config.max_reply_len),
            transport,
            config,
        })
    }

    /// Set the mode of `pin`. Returns the firmware status.
    pub fn set_pin_mode(&mut self, pin: u16, mode: PinMode) -> Result<StatusCode> {
        let reply = self.transact(Command::PinMode {
            pin: Pin::new(pin),
            mode,
        })?;
        Ok(reply.parse_status()?)
    }

    /// Drive `pin` to `level`. Returns the firmware status.
    pub fn digital_write(&mut self, pin: u16, level: DigitalLevel) -> Result<StatusCode> {
        let reply = self.transact(Command::DigitalWrite {
            pin: Pin::new(pin),
            level,
        })?;
        Ok(reply.parse_status()?)
    }

    /// Write a PWM duty cycle to `pin`. Returns the firmware status.
    ///
    /// The firmware accepts 0 to 255; the value is forwarded unclamped.
    pub fn analog_write(&mut self, pin: u16, duty: u16) -> Result<StatusCode> {
        let reply = self.transact(Command::AnalogWrite {
            pin: Pin::new(pin),
            duty,
        })?;
        Ok(reply.parse_status()?)
    }

    /// Read the level of `pin`.
    ///
    /// If the firmware answers with a status code instead of a value, a
    /// warning is logged and `LOW` is returned. Use
    /// [`try_digital_read`](Self::try_digital_read) to get an error instead.
    pub fn digital_read(&mut self, pin: u16) -> Result<DigitalLevel> {
        let reply = self.transact(Command::DigitalRead { pin: Pin::new(pin) })?;
        if reply.is_status() {
            warn!(
                pin,
                reply = %reply,
                "digital_read failed: firmware returned an error code"
            );
            return Ok(DigitalLevel::Low);
        }
        Ok(reply.parse_level())
    }

    /// Read the ADC value of `pin`.
    ///
    /// If the firmware answers with `code N`, a warning is logged and `N`
    /// itself is returned, which is indistinguishable from a reading of `N`.
    /// Use [`try_analog_read`](Self::try_analog_read) when that matters.
    pub fn analog_read(&mut self, pin: u16) -> Result<i32> {
        let reply = self.transact(Command::AnalogRead { pin: Pin::new(pin) })?;
        if reply.is_status() {
            warn!(
                pin,
                reply = %reply,
                "analog_read failed: firmware returned an error code"
            );
        }
        Ok(reply.parse_int()?)
    }

    /// Like [`digital_read`](Self::digital_read), but a status reply is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Firmware` carrying the reported status.
    pub fn try_digital_read(&mut self, pin: u16) -> Result<DigitalLevel> {
        let reply = self.transact(Command::DigitalRead { pin: Pin::new(pin) })?;
        Self::reject_status(&reply)?;
        Ok(reply.parse_level())
    }

    /// Like [`analog_read`](Self::analog_read), but a status reply is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Firmware` carrying the reported status.
    pub fn try_analog_read(&mut self, pin: u16) -> Result<i32> {
        let reply = self.transact(Command::AnalogRead { pin: Pin::new(pin) })?;
        Self::reject_status(&reply)?;
        Ok(reply.parse_int()?)
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the link and hand back its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn reject_status(reply: &Reply) -> Result<()> {
        if reply.is_status() {
            return Err(LinkError::Firmware {
                status: reply.parse_status()?,
            });
        }
        Ok(())
    }

    /// Run one request-reply cycle.
    fn transact(&mut self, command: Command) -> Result<Reply> {
        self.transport.flush()?;

        let line = command.encode();
        debug!(command = %line, "sending command");
        self.transport
            .write(&self.config.line_terminator.frame(&line))?;

        let reply = self.read_reply()?;
        debug!(command = %line, reply = %reply, "received reply");
        Ok(reply)
    }

    /// Busy-poll the transport until a full reply line has been read.
    ///
    /// Reading stops at the terminator, so bytes after it stay buffered in
    /// the transport.
    fn read_reply(&mut self) -> Result<Reply> {
        self.reader.clear();
        let started = Instant::now();
        let timeout = self.config.reply_timeout();

        loop {
            let available = self.transport.bytes_available()?;

            if available == 0 {
                if let Some(timeout) = timeout
                    && started.elapsed() >= timeout
                {
                    warn!(
                        buffered = self.reader.buffered(),
                        "no reply within {}ms",
                        timeout.as_millis()
                    );
                    return Err(LinkError::ReplyTimeout {
                        duration_ms: timeout.as_millis() as u64,
                    });
                }
                self.idle();
                continue;
            }

            for _ in 0..available {
                let byte = self.transport.read_one()?;
                trace!(byte, "reply byte");
                if let Some(reply) = self.reader.push(byte)? {
                    return Ok(reply);
                }
            }
        }
    }

    fn idle(&self) {
        let interval = self.config.poll_interval();
        if interval.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(interval);
        }
    }
}
