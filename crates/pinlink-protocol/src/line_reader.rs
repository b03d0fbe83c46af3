//! Incremental reply-line assembly.
//!
//! Reply bytes arrive one at a time from the transport. The [`LineReader`]
//! accumulates them until the terminating `\n` and then yields a [`Reply`].
//! The caller stops reading as soon as a reply is produced, so no byte past
//! the terminator is ever consumed.
//!
//! # Usage
//!
//! ```
//! use pinlink_protocol::LineReader;
//!
//! let mut reader = LineReader::new();
//!
//! for byte in b"code ".iter().copied() {
//!     assert!(reader.push(byte).unwrap().is_none());
//! }
//! assert!(reader.push(b'0').unwrap().is_none());
//!
//! let reply = reader.push(b'\n').unwrap().unwrap();
//! assert_eq!(reply.line(), "code 0");
//! ```

use pinlink_core::constants::{CARRIAGE_RETURN, DEFAULT_MAX_REPLY_LEN, REPLY_TERMINATOR};
use pinlink_core::{Error, Result};

use crate::Reply;

/// Initial capacity for the line buffer; replies are a handful of bytes.
const INITIAL_LINE_CAPACITY: usize = 16;

/// State of the line reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No byte of the current line has been received.
    Idle,

    /// At least one byte has been received, the terminator has not.
    ReadingLine,
}

/// Accumulates reply bytes into lines.
///
/// ```text
/// ┌──────┐  any byte   ┌─────────────┐  '\n'   ┌─────────────┐
/// │ Idle │────────────>│ ReadingLine │────────>│ Reply ready │
/// └──────┘             └─────────────┘         └─────────────┘
///    ^                        │ len > max_len         │
///    │                        │ (error, reset)        │
///    └────────────────────────┴───────────────────────┘
/// ```
///
/// Bytes map one-to-one onto chars, so line noise never fails decoding; it
/// fails numeric parsing later instead. A single `\r` right before the `\n`
/// is dropped.
#[derive(Debug)]
pub struct LineReader {
    line: Vec<u8>,
    state: ReaderState,
    max_len: usize,
}

impl LineReader {
    /// Create a reader with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_REPLY_LEN)
    }

    /// Create a reader that rejects lines longer than `max_len` bytes.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            line: Vec::with_capacity(INITIAL_LINE_CAPACITY.min(max_len)),
            state: ReaderState::Idle,
            max_len,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(Some(reply))` when `byte` is the terminator and
    /// `Ok(None)` while more bytes are needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReplyTooLong` once the line grows past `max_len`
    /// bytes. The reader is reset in that case.
    pub fn push(&mut self, byte: u8) -> Result<Option<Reply>> {
        if byte == REPLY_TERMINATOR {
            if self.line.last() == Some(&CARRIAGE_RETURN) {
                self.line.pop();
            }
            let line: String = self.line.drain(..).map(char::from).collect();
            self.state = ReaderState::Idle;
            return Ok(Some(Reply::new(line)));
        }

        if self.line.len() >= self.max_len {
            self.clear();
            return Err(Error::ReplyTooLong {
                max_len: self.max_len,
            });
        }

        self.line.push(byte);
        self.state = ReaderState::ReadingLine;
        Ok(None)
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Number of bytes buffered for the current line.
    pub fn buffered(&self) -> usize {
        self.line.len()
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.line.clear();
        self.state = ReaderState::Idle;
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(reader: &mut LineReader, bytes: &[u8]) -> Vec<Reply> {
        bytes
            .iter()
            .filter_map(|b| reader.push(*b).unwrap())
            .collect()
    }

    #[test]
    fn test_terminator_not_in_payload() {
        let mut reader = LineReader::new();
        let replies = feed(&mut reader, b"512\n");
        assert_eq!(replies, vec![Reply::new("512")]);
        assert_eq!(reader.state(), ReaderState::Idle);
    }

    #[test]
    fn test_state_transitions() {
        let mut reader = LineReader::new();
        assert_eq!(reader.state(), ReaderState::Idle);

        reader.push(b'1').unwrap();
        assert_eq!(reader.state(), ReaderState::ReadingLine);
        assert_eq!(reader.buffered(), 1);

        reader.push(b'\n').unwrap();
        assert_eq!(reader.state(), ReaderState::Idle);
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn test_strips_single_carriage_return() {
        let mut reader = LineReader::new();
        assert_eq!(feed(&mut reader, b"1\r\n"), vec![Reply::new("1")]);
        assert_eq!(feed(&mut reader, b"1\r\r\n"), vec![Reply::new("1\r")]);
    }

    #[test]
    fn test_empty_line() {
        let mut reader = LineReader::new();
        assert_eq!(feed(&mut reader, b"\n"), vec![Reply::new("")]);
    }

    #[test]
    fn test_multiple_lines() {
        let mut reader = LineReader::new();
        let replies = feed(&mut reader, b"code 0\n1\n");
        assert_eq!(replies, vec![Reply::new("code 0"), Reply::new("1")]);
    }

    #[test]
    fn test_non_ascii_bytes_are_kept() {
        let mut reader = LineReader::new();
        let replies = feed(&mut reader, &[0xFF, b'1', b'\n']);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].line(), "\u{FF}1");
        assert!(replies[0].parse_int().is_err());
    }

    #[test]
    fn test_line_too_long() {
        let mut reader = LineReader::with_max_len(4);
        for byte in b"1234" {
            assert!(reader.push(*byte).unwrap().is_none());
        }
        let err = reader.push(b'5').unwrap_err();
        assert_eq!(err, Error::ReplyTooLong { max_len: 4 });
        assert_eq!(reader.state(), ReaderState::Idle);

        // A line of exactly max_len still fits.
        assert_eq!(feed(&mut reader, b"1234\n"), vec![Reply::new("1234")]);
    }
}
