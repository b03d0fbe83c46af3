use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pin identifier.
///
/// Bounds are checked by the firmware, not the client, so any non-negative
/// value is accepted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(u16);

impl Pin {
    /// Create a pin identifier.
    #[must_use]
    pub const fn new(pin: u16) -> Self {
        Pin(pin)
    }

    /// Get the raw pin number.
    #[must_use]
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u16> for Pin {
    fn from(pin: u16) -> Self {
        Pin(pin)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u16>()
            .map(Pin)
            .map_err(|_| Error::InvalidPin(s.to_string()))
    }
}

/// Configured direction and pull of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinMode {
    Input,
    Output,
    InputPullup,
}

impl PinMode {
    /// All pin modes, in firmware declaration order.
    pub const ALL: [PinMode; 3] = [PinMode::Input, PinMode::Output, PinMode::InputPullup];

    /// Parse the uppercase wire name.
    ///
    /// # Errors
    /// Returns `Error::InvalidPinMode` for anything other than `INPUT`,
    /// `OUTPUT` or `INPUT_PULLUP`. Matching is case-sensitive, like the
    /// firmware's.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "INPUT" => Ok(PinMode::Input),
            "OUTPUT" => Ok(PinMode::Output),
            "INPUT_PULLUP" => Ok(PinMode::InputPullup),
            _ => Err(Error::InvalidPinMode(s.to_string())),
        }
    }

    /// Uppercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PinMode::Input => "INPUT",
            PinMode::Output => "OUTPUT",
            PinMode::InputPullup => "INPUT_PULLUP",
        }
    }

    /// Whether the pin is read from rather than driven.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, PinMode::Input | PinMode::InputPullup)
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PinMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PinMode::parse(s)
    }
}

/// Two-valued logical voltage on a pin.
///
/// Depending on the microcontroller, HIGH is 3.3V or 5V.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DigitalLevel {
    #[default]
    Low,
    High,
}

impl DigitalLevel {
    /// Parse the uppercase wire name.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigitalLevel` for anything other than `LOW` or
    /// `HIGH`.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "LOW" => Ok(DigitalLevel::Low),
            "HIGH" => Ok(DigitalLevel::High),
            _ => Err(Error::InvalidDigitalLevel(s.to_string())),
        }
    }

    /// Uppercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DigitalLevel::Low => "LOW",
            DigitalLevel::High => "HIGH",
        }
    }

    #[must_use]
    pub fn is_high(&self) -> bool {
        matches!(self, DigitalLevel::High)
    }
}

impl From<bool> for DigitalLevel {
    fn from(high: bool) -> Self {
        if high {
            DigitalLevel::High
        } else {
            DigitalLevel::Low
        }
    }
}

impl From<DigitalLevel> for bool {
    fn from(level: DigitalLevel) -> Self {
        level.is_high()
    }
}

impl fmt::Display for DigitalLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DigitalLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DigitalLevel::parse(s)
    }
}

/// Known firmware status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Success,
    AllocationFailure,
    MissingFramingTag,
    InvalidPin,
    InvalidPinMode,
    InvalidCommand,
}

impl StatusKind {
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            StatusKind::Success => 0,
            StatusKind::AllocationFailure => 1,
            StatusKind::MissingFramingTag => 2,
            StatusKind::InvalidPin => 3,
            StatusKind::InvalidPinMode => 4,
            StatusKind::InvalidCommand => 5,
        }
    }
}

/// Status code reported by the firmware for write-class operations.
///
/// Values outside the known set are reserved and kept unchanged.
///
/// # Examples
///
/// ```
/// use pinlink_core::{StatusCode, StatusKind};
///
/// let status = StatusCode::new(3);
/// assert!(!status.is_success());
/// assert_eq!(status.kind(), Some(StatusKind::InvalidPin));
///
/// assert_eq!(StatusCode::new(42).kind(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(i32);

impl StatusCode {
    pub const SUCCESS: StatusCode = StatusCode(0);

    #[must_use]
    pub const fn new(code: i32) -> Self {
        StatusCode(code)
    }

    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Classify the code, or `None` for reserved values.
    #[must_use]
    pub fn kind(&self) -> Option<StatusKind> {
        match self.0 {
            0 => Some(StatusKind::Success),
            1 => Some(StatusKind::AllocationFailure),
            2 => Some(StatusKind::MissingFramingTag),
            3 => Some(StatusKind::InvalidPin),
            4 => Some(StatusKind::InvalidPinMode),
            5 => Some(StatusKind::InvalidCommand),
            _ => None,
        }
    }

    /// Human-readable meaning of the code.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self.kind() {
            Some(StatusKind::Success) => "success",
            Some(StatusKind::AllocationFailure) => "character allocation failure",
            Some(StatusKind::MissingFramingTag) => "command does not start with VMX",
            Some(StatusKind::InvalidPin) => "invalid pin",
            Some(StatusKind::InvalidPinMode) => "invalid pin mode",
            Some(StatusKind::InvalidCommand) => "invalid command",
            None => "reserved status code",
        }
    }
}

impl From<StatusKind> for StatusCode {
    fn from(kind: StatusKind) -> Self {
        StatusCode(kind.code())
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.0
    }
}

impl PartialEq<i32> for StatusCode {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
