//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pinlink_client::LinkConfig;
use pinlink_core::{DigitalLevel, PinMode};
use pinlink_protocol::LineTerminator;

/// Drive microcontroller pins over a serial link.
#[derive(Debug, Parser)]
#[command(name = "pinlink", version, about)]
pub struct Cli {
    /// JSON file with link settings; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serial port (e.g. /dev/ttyACM0, COM3)
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long, global = true)]
    pub baud: Option<u32>,

    /// Give up on a reply after this many milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Bytes appended to each command: none, lf or crlf
    #[arg(long, global = true)]
    pub line_ending: Option<LineTerminator>,

    /// Talk to an in-process emulated board instead of a serial port
    #[arg(long, global = true)]
    pub emulate: bool,

    /// Fail reads that the firmware answers with a status code
    #[arg(long, global = true)]
    pub strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: PinCommand,
}

#[derive(Debug, Subcommand)]
pub enum PinCommand {
    /// Set a pin's mode
    PinMode {
        pin: u16,
        #[arg(value_parser = parse_mode)]
        mode: PinMode,
    },

    /// Drive a pin HIGH or LOW
    DigitalWrite {
        pin: u16,
        #[arg(value_parser = parse_level)]
        level: DigitalLevel,
    },

    /// Read a pin's digital level
    DigitalRead { pin: u16 },

    /// Write a PWM duty cycle (0-255)
    AnalogWrite { pin: u16, duty: u16 },

    /// Read a pin's ADC value (0-1023)
    AnalogRead { pin: u16 },

    /// List serial ports present on this machine
    ListPorts,
}

fn parse_mode(s: &str) -> Result<PinMode, pinlink_core::Error> {
    PinMode::parse(&s.to_ascii_uppercase())
}

fn parse_level(s: &str) -> Result<DigitalLevel, pinlink_core::Error> {
    DigitalLevel::parse(&s.to_ascii_uppercase())
}

impl Cli {
    /// Build the link configuration from the config file and flags.
    pub fn link_config(&self) -> Result<LinkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => LinkConfig::default(),
        };

        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.reply_timeout_ms = Some(timeout_ms);
        }
        if let Some(line_ending) = self.line_ending {
            config.line_terminator = line_ending;
        }

        config.validate().context("invalid link configuration")?;
        Ok(config)
    }

    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommand() {
        let cli = Cli::try_parse_from(["pinlink", "pin-mode", "7", "output"]).unwrap();
        assert!(matches!(
            cli.command,
            PinCommand::PinMode {
                pin: 7,
                mode: PinMode::Output
            }
        ));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pinlink",
            "--port",
            "COM3",
            "--baud",
            "115200",
            "--timeout-ms",
            "250",
            "--line-ending",
            "lf",
            "digital-read",
            "2",
        ])
        .unwrap();

        let config = cli.link_config().unwrap();
        assert_eq!(config.port, "COM3");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.reply_timeout_ms, Some(250));
        assert_eq!(config.line_terminator, LineTerminator::Lf);
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(Cli::try_parse_from(["pinlink", "digital-write", "13", "ON"]).is_err());
    }

    #[test]
    fn test_zero_baud_rejected() {
        let cli = Cli::try_parse_from(["pinlink", "-b", "0", "analog-read", "0"]).unwrap();
        assert!(cli.link_config().is_err());
    }

    #[test]
    fn test_list_ports_takes_no_arguments() {
        let cli = Cli::try_parse_from(["pinlink", "list-ports"]).unwrap();
        assert!(matches!(cli.command, PinCommand::ListPorts));
        assert!(Cli::try_parse_from(["pinlink", "list-ports", "3"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["pinlink", "-vv", "analog-read", "0"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
    }
}
