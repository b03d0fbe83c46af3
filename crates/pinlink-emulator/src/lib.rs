//! In-process emulation of a board running the VMX pin firmware.
//!
//! This crate answers `VMX` commands the way the companion firmware does,
//! so the client can be exercised end to end without hardware. The
//! [`EmulatedBoard`] plugs in wherever a transport is expected and a
//! [`BoardHandle`] lets the test drive inputs and inspect outputs.

pub mod board;
pub mod transport;

pub use board::{Board, PinState};
pub use transport::{BoardHandle, EmulatedBoard};
