//! Link configuration.

use std::time::Duration;

use pinlink_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_MAX_REPLY_LEN, DEFAULT_PORT};
use pinlink_core::{Error, Result};
use pinlink_protocol::LineTerminator;
use serde::{Deserialize, Serialize};

/// Configuration for a [`PinLink`](crate::PinLink).
///
/// Every field has a default, so a partial JSON document deserializes.
///
/// # Example
///
/// ```
/// use pinlink_client::LinkConfig;
/// use pinlink_protocol::LineTerminator;
/// use std::time::Duration;
///
/// let config = LinkConfig::default()
///     .with_port("/dev/ttyUSB0")
///     .with_baud_rate(115_200)
///     .with_reply_timeout(Duration::from_millis(500))
///     .with_line_terminator(LineTerminator::Lf);
///
/// assert_eq!(config.reply_timeout(), Some(Duration::from_millis(500)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial port identifier (e.g. "/dev/ttyACM0", "COM3")
    pub port: String,

    /// Baud rate, typically 9600 to 115200
    pub baud_rate: u32,

    /// Deadline for a reply in milliseconds; `None` waits indefinitely
    pub reply_timeout_ms: Option<u64>,

    /// Sleep between empty polls in microseconds; 0 yields the thread
    pub poll_interval_us: u64,

    /// Bytes appended after each command line
    pub line_terminator: LineTerminator,

    /// Longest accepted reply line in bytes
    pub max_reply_len: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            reply_timeout_ms: None,
            poll_interval_us: 0,
            line_terminator: LineTerminator::None,
            max_reply_len: DEFAULT_MAX_REPLY_LEN,
        }
    }
}

impl LinkConfig {
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the reply deadline, rounded up to whole milliseconds.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_micros().div_ceil(1000);
        self.reply_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    pub fn without_reply_timeout(mut self) -> Self {
        self.reply_timeout_ms = None;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_us = u64::try_from(interval.as_micros()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    pub fn with_max_reply_len(mut self, max_reply_len: usize) -> Self {
        self.max_reply_len = max_reply_len;
        self
    }

    pub fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.poll_interval_us)
    }

    /// Check the configuration for values no link can work with.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty port, a zero baud rate, a zero
    /// reply timeout or a zero maximum reply length.
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(Error::Config("port must not be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(Error::Config("baud rate must be positive".to_string()));
        }
        if self.reply_timeout_ms == Some(0) {
            return Err(Error::Config(
                "reply timeout must be positive".to_string(),
            ));
        }
        if self.max_reply_len == 0 {
            return Err(Error::Config(
                "max reply length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
