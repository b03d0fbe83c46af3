use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Reply errors
    #[error("Invalid number in reply: {payload:?}")]
    InvalidNumber { payload: String },

    #[error("Reply exceeded {max_len} bytes without a terminator")]
    ReplyTooLong { max_len: usize },

    // Command errors
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Missing framing tag, got {0:?}")]
    MissingFramingTag(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    // Enumeration tokens
    #[error("Invalid pin mode: {0}")]
    InvalidPinMode(String),

    #[error("Invalid digital level: {0}")]
    InvalidDigitalLevel(String),

    #[error("Invalid pin: {0}")]
    InvalidPin(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
