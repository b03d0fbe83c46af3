//! Line terminators appended to outgoing commands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pinlink_core::{Error, Result};

/// Bytes written after a command line.
///
/// The command line itself never contains a newline; the terminator is
/// appended only when the bytes are put on the wire. `None` writes the line
/// as-is, which relies on the firmware treating each write as one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    None,
    Lf,
    CrLf,
}

impl LineTerminator {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineTerminator::None => b"",
            LineTerminator::Lf => b"\n",
            LineTerminator::CrLf => b"\r\n",
        }
    }

    /// Encode `line` followed by this terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlink_protocol::LineTerminator;
    ///
    /// assert_eq!(LineTerminator::None.frame("VMX ANALOG 0"), b"VMX ANALOG 0");
    /// assert_eq!(LineTerminator::Lf.frame("VMX ANALOG 0"), b"VMX ANALOG 0\n");
    /// ```
    pub fn frame(&self, line: &str) -> Vec<u8> {
        let suffix = self.as_bytes();
        let mut bytes = Vec::with_capacity(line.len() + suffix.len());
        bytes.extend_from_slice(line.as_bytes());
        bytes.extend_from_slice(suffix);
        bytes
    }
}

impl fmt::Display for LineTerminator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            LineTerminator::None => "none",
            LineTerminator::Lf => "lf",
            LineTerminator::CrLf => "crlf",
        })
    }
}

impl FromStr for LineTerminator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(LineTerminator::None),
            "lf" => Ok(LineTerminator::Lf),
            "crlf" => Ok(LineTerminator::CrLf),
            _ => Err(Error::Config(format!("unknown line terminator {s:?}"))),
        }
    }
}
