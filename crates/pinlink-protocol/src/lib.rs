pub mod commands;
pub mod line_reader;
pub mod reply;
pub mod terminator;

pub use commands::{Command, CommandKind};
pub use line_reader::{LineReader, ReaderState};
pub use reply::Reply;
pub use terminator::LineTerminator;
