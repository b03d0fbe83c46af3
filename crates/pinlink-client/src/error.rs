use pinlink_core::StatusCode;
use pinlink_transport::TransportError;
use thiserror::Error;

/// Errors that can occur during a request-reply cycle.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Transport failure, propagated unchanged
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed reply or invalid configuration
    #[error("Protocol error: {0}")]
    Protocol(#[from] pinlink_core::Error),

    /// No complete reply arrived before the configured deadline
    #[error("Reply timeout after {duration_ms}ms")]
    ReplyTimeout { duration_ms: u64 },

    /// Firmware answered a read with a status code (strict reads only)
    #[error("Firmware reported status {status}: {}", .status.description())]
    Firmware { status: StatusCode },
}

pub type Result<T> = std::result::Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LinkError::Firmware {
            status: StatusCode::new(3),
        };
        assert_eq!(error.to_string(), "Firmware reported status 3: invalid pin");

        let error = LinkError::ReplyTimeout { duration_ms: 500 };
        assert_eq!(error.to_string(), "Reply timeout after 500ms");

        let error: LinkError = TransportError::disconnected("COM3").into();
        assert_eq!(
            error.to_string(),
            "Transport error: Device disconnected: COM3"
        );
    }
}
