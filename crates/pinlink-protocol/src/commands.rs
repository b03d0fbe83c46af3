//! Command definitions for the VMX pin protocol.
//!
//! Every command is a single ASCII line of tokens separated by exactly one
//! space. The first token is the framing tag `VMX`, the second names the
//! operation, and the rest are operation-specific arguments.
//!
//! # Wire Format
//!
//! | Operation | Wire form |
//! |---|---|
//! | set pin mode | `VMX PINMODE <pin> <INPUT\|OUTPUT\|INPUT_PULLUP>` |
//! | digital write | `VMX DIGITALWRITE <pin> <HIGH\|LOW>` |
//! | digital read | `VMX DIGITALREAD <pin>` |
//! | analog write | `VMX ANALOGWRITE <pin> <duty>` |
//! | analog read | `VMX ANALOG <pin>` |
//!
//! # Examples
//!
//! ```
//! use pinlink_core::{Pin, PinMode};
//! use pinlink_protocol::Command;
//!
//! let cmd = Command::PinMode { pin: Pin::new(7), mode: PinMode::Output };
//! assert_eq!(cmd.encode(), "VMX PINMODE 7 OUTPUT");
//!
//! let parsed = Command::parse("VMX PINMODE 7 OUTPUT").unwrap();
//! assert_eq!(parsed, cmd);
//! ```

use pinlink_core::constants::{FRAMING_TAG, TOKEN_SEPARATOR};
use pinlink_core::{DigitalLevel, Error, Pin, PinMode, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation names, the second token of every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    PinMode,      // PINMODE
    DigitalWrite, // DIGITALWRITE
    DigitalRead,  // DIGITALREAD
    AnalogWrite,  // ANALOGWRITE
    AnalogRead,   // ANALOG
}

impl CommandKind {
    /// Parse an operation name.
    ///
    /// `ANALOGREAD` is accepted as an alias of `ANALOG` because the
    /// companion firmware sketch listens for that spelling.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PINMODE" => Ok(CommandKind::PinMode),
            "DIGITALWRITE" => Ok(CommandKind::DigitalWrite),
            "DIGITALREAD" => Ok(CommandKind::DigitalRead),
            "ANALOGWRITE" => Ok(CommandKind::AnalogWrite),
            "ANALOG" | "ANALOGREAD" => Ok(CommandKind::AnalogRead),
            _ => Err(Error::UnknownOperation(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::PinMode => "PINMODE",
            CommandKind::DigitalWrite => "DIGITALWRITE",
            CommandKind::DigitalRead => "DIGITALREAD",
            CommandKind::AnalogWrite => "ANALOGWRITE",
            CommandKind::AnalogRead => "ANALOG",
        }
    }

    /// Read-class operations answer with a bare value rather than a status.
    pub fn is_read(&self) -> bool {
        matches!(self, CommandKind::DigitalRead | CommandKind::AnalogRead)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command record.
///
/// The record is encoded without a line terminator; see
/// [`LineTerminator`](crate::LineTerminator) for how the line is closed on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    PinMode { pin: Pin, mode: PinMode },
    DigitalWrite { pin: Pin, level: DigitalLevel },
    DigitalRead { pin: Pin },
    AnalogWrite { pin: Pin, duty: u16 },
    AnalogRead { pin: Pin },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::PinMode { .. } => CommandKind::PinMode,
            Command::DigitalWrite { .. } => CommandKind::DigitalWrite,
            Command::DigitalRead { .. } => CommandKind::DigitalRead,
            Command::AnalogWrite { .. } => CommandKind::AnalogWrite,
            Command::AnalogRead { .. } => CommandKind::AnalogRead,
        }
    }

    pub fn pin(&self) -> Pin {
        match self {
            Command::PinMode { pin, .. }
            | Command::DigitalWrite { pin, .. }
            | Command::DigitalRead { pin }
            | Command::AnalogWrite { pin, .. }
            | Command::AnalogRead { pin } => *pin,
        }
    }

    /// Render the command line, without terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlink_core::{DigitalLevel, Pin};
    /// use pinlink_protocol::Command;
    ///
    /// let cmd = Command::DigitalWrite { pin: Pin::new(13), level: DigitalLevel::High };
    /// assert_eq!(cmd.encode(), "VMX DIGITALWRITE 13 HIGH");
    ///
    /// let cmd = Command::AnalogRead { pin: Pin::new(0) };
    /// assert_eq!(cmd.encode(), "VMX ANALOG 0");
    /// ```
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse a command line the way the firmware does.
    ///
    /// Tokens may be separated by runs of spaces, and tokens past the
    /// expected arguments are ignored. A trailing `\r` or `\n` is tolerated.
    ///
    /// # Errors
    ///
    /// - `Error::MissingFramingTag` if the first token is not `VMX`
    /// - `Error::UnknownOperation` for an unrecognized operation name
    /// - `Error::MissingArgument` if an argument is absent
    /// - `Error::InvalidPin`, `Error::InvalidPinMode`,
    ///   `Error::InvalidDigitalLevel` or `Error::InvalidCommand` for a
    ///   malformed argument
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut tokens = line.split(TOKEN_SEPARATOR).filter(|t| !t.is_empty());

        let tag = tokens.next().unwrap_or_default();
        if tag != FRAMING_TAG {
            return Err(Error::MissingFramingTag(tag.to_string()));
        }

        let kind = CommandKind::parse(tokens.next().unwrap_or_default())?;
        let pin: Pin = next_argument(&mut tokens, "pin")?.parse()?;

        let command = match kind {
            CommandKind::PinMode => Command::PinMode {
                pin,
                mode: next_argument(&mut tokens, "mode")?.parse()?,
            },
            CommandKind::DigitalWrite => Command::DigitalWrite {
                pin,
                level: next_argument(&mut tokens, "level")?.parse()?,
            },
            CommandKind::DigitalRead => Command::DigitalRead { pin },
            CommandKind::AnalogWrite => {
                let duty = next_argument(&mut tokens, "duty")?;
                Command::AnalogWrite {
                    pin,
                    duty: duty
                        .parse()
                        .map_err(|_| Error::InvalidCommand(format!("invalid duty {duty:?}")))?,
                }
            }
            CommandKind::AnalogRead => Command::AnalogRead { pin },
        };

        Ok(command)
    }
}

fn next_argument<'a>(tokens: &mut impl Iterator<Item = &'a str>, name: &str) -> Result<&'a str> {
    tokens
        .next()
        .ok_or_else(|| Error::MissingArgument(name.to_string()))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{FRAMING_TAG} {} {}", self.kind(), self.pin())?;
        match self {
            Command::PinMode { mode, .. } => write!(f, " {mode}"),
            Command::DigitalWrite { level, .. } => write!(f, " {level}"),
            Command::AnalogWrite { duty, .. } => write!(f, " {duty}"),
            Command::DigitalRead { .. } | Command::AnalogRead { .. } => Ok(()),
        }
    }
}
