//! Scripted mock transport for testing.
//!
//! The mock records every call made on it and answers writes with replies
//! queued in advance, so tests can verify both the bytes on the wire and the
//! order in which the client touched the transport.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

const DEVICE_NAME: &str = "mock";

/// One recorded call on a [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Flush,
    Write(Vec<u8>),
    /// `bytes_available` and the count it reported.
    BytesAvailable(usize),
    /// `read_one` and the byte it returned.
    ReadOne(u8),
}

/// Mock transport driven by a script of replies.
///
/// Replies queued with [`queue_reply`](MockTransport::queue_reply) are
/// delivered into the receive buffer when the next `write` happens, so a
/// `flush` issued before the write cannot discard them. Bytes placed with
/// [`preload`](MockTransport::preload) sit in the receive buffer right away
/// and model line noise left over from an earlier exchange.
///
/// # Examples
///
/// ```
/// use pinlink_transport::{MockTransport, Transport};
///
/// let mut mock = MockTransport::new();
/// mock.preload(b"garbage");
/// mock.queue_reply(b"code 0\n");
///
/// mock.flush().unwrap();
/// assert_eq!(mock.bytes_available().unwrap(), 0);
///
/// mock.write(b"VMX PINMODE 7 OUTPUT").unwrap();
/// assert_eq!(mock.bytes_available().unwrap(), 7);
/// assert_eq!(mock.read_one().unwrap(), b'c');
/// assert_eq!(mock.written(), b"VMX PINMODE 7 OUTPUT");
/// ```
#[derive(Debug)]
pub struct MockTransport {
    rx: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    calls: Vec<TransportCall>,
    poll_delay: usize,
    pending_polls: usize,
    connected: bool,
}

impl MockTransport {
    /// Create a connected mock with an empty script.
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            replies: VecDeque::new(),
            writes: Vec::new(),
            calls: Vec::new(),
            poll_delay: 0,
            pending_polls: 0,
            connected: true,
        }
    }

    /// Queue `bytes` to arrive after the next write.
    pub fn queue_reply(&mut self, bytes: &[u8]) -> &mut Self {
        self.replies.push_back(bytes.to_vec());
        self
    }

    /// Put `bytes` into the receive buffer immediately.
    pub fn preload(&mut self, bytes: &[u8]) -> &mut Self {
        self.rx.extend(bytes);
        self
    }

    /// Report zero available bytes for the first `polls` queries after each
    /// write, to exercise the client's polling loop.
    pub fn set_poll_delay(&mut self, polls: usize) -> &mut Self {
        self.poll_delay = polls;
        self
    }

    /// Make every subsequent call fail with `TransportError::Disconnected`.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Every write, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All written bytes concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.writes.concat()
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> &[TransportCall] {
        &self.calls
    }

    /// Number of `flush` calls so far.
    pub fn flush_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Flush))
            .count()
    }

    /// Bytes still sitting unread in the receive buffer.
    pub fn unread(&self) -> Vec<u8> {
        self.rx.iter().copied().collect()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(TransportError::disconnected(DEVICE_NAME))
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn flush(&mut self) -> Result<()> {
        self.ensure_connected()?;
        self.calls.push(TransportCall::Flush);
        self.rx.clear();
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        trace!("mock write {:?}", String::from_utf8_lossy(bytes));
        self.calls.push(TransportCall::Write(bytes.to_vec()));
        self.writes.push(bytes.to_vec());

        if let Some(reply) = self.replies.pop_front() {
            self.rx.extend(reply);
        }
        self.pending_polls = self.poll_delay;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize> {
        self.ensure_connected()?;
        let available = if self.pending_polls > 0 {
            self.pending_polls -= 1;
            0
        } else {
            self.rx.len()
        };
        self.calls.push(TransportCall::BytesAvailable(available));
        Ok(available)
    }

    fn read_one(&mut self) -> Result<u8> {
        self.ensure_connected()?;
        let byte = self
            .rx
            .pop_front()
            .ok_or_else(|| TransportError::no_data(DEVICE_NAME))?;
        self.calls.push(TransportCall::ReadOne(byte));
        Ok(byte)
    }
}
