//! Mock transport implementations for testing and development.
//!
//! This module provides transports that can be controlled programmatically
//! without requiring a physical serial port.

pub mod scripted;

// Re-export commonly used types
pub use scripted::{MockTransport, TransportCall};
