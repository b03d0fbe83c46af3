//! Reply lines sent back by the firmware.
//!
//! A reply is one line terminated by `\n`. Two shapes exist:
//!
//! ```text
//! code <N>\n    status reply (write-class success or any failure)
//! <N>\n         value reply (read-class success)
//! ```
//!
//! The `code ` prefix is stripped uniformly before the payload is parsed, so
//! `code 3` and `3` both parse as the integer 3.

use pinlink_core::constants::{STATUS_MARKER, STATUS_PREFIX};
use pinlink_core::{DigitalLevel, Error, Result, StatusCode};
use std::fmt;

/// One decoded reply line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    line: String,
}

impl Reply {
    /// Wrap a line whose terminator has already been removed.
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// The full line as received.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Whether the firmware flagged this reply as a status report.
    ///
    /// For read-class operations this means the firmware failed.
    pub fn is_status(&self) -> bool {
        self.line.starts_with(STATUS_MARKER)
    }

    /// The line with a leading `code ` removed, if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlink_protocol::Reply;
    ///
    /// assert_eq!(Reply::new("code 0").payload(), "0");
    /// assert_eq!(Reply::new("512").payload(), "512");
    /// ```
    pub fn payload(&self) -> &str {
        self.line
            .strip_prefix(STATUS_PREFIX)
            .unwrap_or(&self.line)
    }

    /// Parse the payload as a decimal integer.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNumber` if the payload is not a decimal integer.
    pub fn parse_int(&self) -> Result<i32> {
        let payload = self.payload();
        payload.parse().map_err(|_| Error::InvalidNumber {
            payload: payload.to_string(),
        })
    }

    /// Parse the payload as a firmware status code.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNumber` if the payload is not a decimal integer.
    pub fn parse_status(&self) -> Result<StatusCode> {
        self.parse_int().map(StatusCode::new)
    }

    /// Interpret the payload as a digital level.
    ///
    /// Only the exact payload `1` is HIGH; everything else is LOW.
    pub fn parse_level(&self) -> DigitalLevel {
        DigitalLevel::from(self.payload() == "1")
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.line)
    }
}
