//! Transport front-end for the emulated board.
//!
//! The firmware reads bytes until `\n` and then executes the line. The
//! emulator accepts that framing too, but also treats a write without any
//! `\n` as one complete command, so it works with every
//! [`LineTerminator`](pinlink_protocol::LineTerminator) setting.
//!
//! Replies end in `\r\n`, like the firmware's `Serial.println`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pinlink_core::DigitalLevel;
use pinlink_core::constants::{MAX_ADC_VALUE, REPLY_TERMINATOR};
use pinlink_transport::{Result, Transport, TransportError};
use tracing::trace;

use crate::board::{Board, PinState};

const DEVICE_NAME: &str = "emulated-board";

/// Reply terminator printed by the firmware.
const REPLY_LINE_END: &[u8] = b"\r\n";

/// State shared between the transport and its handle.
#[derive(Debug)]
struct Shared {
    board: Board,
    rx: VecDeque<u8>,
    commands: Vec<String>,
    silent: bool,
    connected: bool,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Emulated board reachable through the [`Transport`] trait.
///
/// # Examples
///
/// ```
/// use pinlink_emulator::EmulatedBoard;
/// use pinlink_transport::Transport;
///
/// let (mut board, handle) = EmulatedBoard::new(20);
/// handle.set_analog(0, 512);
///
/// board.write(b"VMX ANALOG 0").unwrap();
/// let mut reply = Vec::new();
/// while board.bytes_available().unwrap() > 0 {
///     reply.push(board.read_one().unwrap());
/// }
/// assert_eq!(reply, b"512\r\n");
/// ```
#[derive(Debug)]
pub struct EmulatedBoard {
    shared: Arc<Mutex<Shared>>,
    pending: Vec<u8>,
}

impl EmulatedBoard {
    /// Create a board with `pin_count` pins and a handle to control it.
    pub fn new(pin_count: u16) -> (Self, BoardHandle) {
        let shared = Arc::new(Mutex::new(Shared {
            board: Board::new(pin_count),
            rx: VecDeque::new(),
            commands: Vec::new(),
            silent: false,
            connected: true,
        }));

        let board = Self {
            shared: Arc::clone(&shared),
            pending: Vec::new(),
        };

        (board, BoardHandle { shared })
    }

    fn execute(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line).into_owned();
        let mut shared = lock(&self.shared);
        let reply = shared.board.execute(&line);
        shared.commands.push(line);

        if !shared.silent {
            shared.rx.extend(reply.as_bytes());
            shared.rx.extend(REPLY_LINE_END);
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        if lock(&self.shared).connected {
            Ok(())
        } else {
            Err(TransportError::disconnected(DEVICE_NAME))
        }
    }
}

impl Default for EmulatedBoard {
    fn default() -> Self {
        Self::new(pinlink_core::constants::DEFAULT_PIN_COUNT).0
    }
}

impl Transport for EmulatedBoard {
    fn flush(&mut self) -> Result<()> {
        self.ensure_connected()?;
        lock(&self.shared).rx.clear();
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        trace!("emulator received {:?}", String::from_utf8_lossy(bytes));
        self.pending.extend_from_slice(bytes);

        if !self.pending.contains(&REPLY_TERMINATOR) {
            let line = std::mem::take(&mut self.pending);
            self.execute(&line);
            return Ok(());
        }

        while let Some(end) = self.pending.iter().position(|b| *b == REPLY_TERMINATOR) {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.execute(&line);
        }
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize> {
        self.ensure_connected()?;
        Ok(lock(&self.shared).rx.len())
    }

    fn read_one(&mut self) -> Result<u8> {
        self.ensure_connected()?;
        lock(&self.shared)
            .rx
            .pop_front()
            .ok_or_else(|| TransportError::no_data(DEVICE_NAME))
    }
}

/// Handle for driving and inspecting an [`EmulatedBoard`].
///
/// The handle can be cloned and kept after the board has been moved into a
/// client.
#[derive(Debug, Clone)]
pub struct BoardHandle {
    shared: Arc<Mutex<Shared>>,
}

impl BoardHandle {
    /// Apply an external level to `pin`. Ignored for pins off the board.
    pub fn set_input(&self, pin: u16, level: DigitalLevel) {
        if let Some(state) = lock(&self.shared).board.pin_mut(pin) {
            state.input = Some(level);
        }
    }

    /// Set the value an analog read of `pin` returns, clamped to the ADC
    /// range.
    pub fn set_analog(&self, pin: u16, value: i32) {
        if let Some(state) = lock(&self.shared).board.pin_mut(pin) {
            state.adc = value.clamp(0, MAX_ADC_VALUE);
        }
    }

    /// Snapshot of `pin`, or `None` if the board has no such pin.
    pub fn pin(&self, pin: u16) -> Option<PinState> {
        lock(&self.shared).board.pin(pin).copied()
    }

    /// Push raw bytes onto the receive side, as line noise would.
    pub fn inject_noise(&self, bytes: &[u8]) {
        lock(&self.shared).rx.extend(bytes);
    }

    /// Stop answering commands (they are still executed and logged).
    pub fn set_silent(&self, silent: bool) {
        lock(&self.shared).silent = silent;
    }

    /// Make every transport call fail as if the cable were pulled.
    pub fn disconnect(&self) {
        lock(&self.shared).connected = false;
    }

    /// Every command line received so far, terminators included.
    pub fn commands(&self) -> Vec<String> {
        lock(&self.shared).commands.clone()
    }
}
