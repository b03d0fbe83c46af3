//! Core constants for the VMX pin protocol.
//!
//! This module defines the protocol-level constants shared by the codec, the
//! client and the board emulator.
//!
//! # Protocol Structure
//!
//! Every command is a single ASCII line of space-separated tokens:
//!
//! ```text
//! VMX <OPERATION> <PIN> [ARGUMENT]
//! ```
//!
//! Every reply is a single line terminated by `\n`, either a status reply
//! (`code <N>`) or a bare value (`<N>`).
//!
//! # Usage
//!
//! ```
//! use pinlink_core::constants::*;
//!
//! assert_eq!(FRAMING_TAG, "VMX");
//! assert_eq!(REPLY_TERMINATOR, b'\n');
//!
//! let line = "code 3";
//! assert_eq!(line.strip_prefix(STATUS_PREFIX), Some("3"));
//! ```

// ============================================================================
// Wire Format
// ============================================================================

/// Literal tag that begins every command line.
pub const FRAMING_TAG: &str = "VMX";

/// Separator between command tokens. Always exactly one space.
pub const TOKEN_SEPARATOR: char = ' ';

/// Byte that terminates every reply line.
pub const REPLY_TERMINATOR: u8 = b'\n';

/// Carriage return sent by `println` style firmware before the terminator.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Prefix of a status reply, including the trailing space.
///
/// The prefix is stripped before the payload is parsed.
///
/// # Examples
///
/// ```
/// use pinlink_core::constants::STATUS_PREFIX;
///
/// assert_eq!("code 0".strip_prefix(STATUS_PREFIX), Some("0"));
/// assert_eq!("512".strip_prefix(STATUS_PREFIX), None);
/// ```
pub const STATUS_PREFIX: &str = "code ";

/// Marker that flags a read-class reply as a firmware failure.
///
/// Unlike [`STATUS_PREFIX`] this has no trailing space.
pub const STATUS_MARKER: &str = "code";

// ============================================================================
// Value Ranges
// ============================================================================

/// Largest PWM duty the firmware's `analogWrite` accepts.
///
/// The client does not clamp; this is informational.
pub const MAX_PWM_DUTY: u16 = 255;

/// Largest value returned by a 10-bit ADC read.
pub const MAX_ADC_VALUE: i32 = 1023;

// ============================================================================
// Link Defaults
// ============================================================================

/// Default baud rate, matching the companion firmware sketch.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default serial port path.
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Default maximum reply length in bytes, excluding the terminator.
///
/// Replies are at most a few characters long; anything longer without a
/// newline is line noise.
pub const DEFAULT_MAX_REPLY_LEN: usize = 256;

/// Number of digital pins on the default emulated board (Arduino Uno).
pub const DEFAULT_PIN_COUNT: u16 = 20;
