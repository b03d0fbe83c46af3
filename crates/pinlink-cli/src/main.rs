mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pinlink_client::PinLink;
use pinlink_core::StatusCode;
use pinlink_emulator::EmulatedBoard;
use pinlink_transport::{SerialTransport, Transport};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, PinCommand};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if let PinCommand::ListPorts = cli.command {
        for port in SerialTransport::available_ports().context("listing serial ports")? {
            println!("{port}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.link_config()?;

    let transport: Box<dyn Transport> = if cli.emulate {
        info!("Using emulated board");
        Box::new(EmulatedBoard::default())
    } else {
        let port = SerialTransport::open(&config.port, config.baud_rate)
            .with_context(|| format!("opening {}", config.port))?;
        Box::new(port)
    };

    let mut link = PinLink::with_config(transport, config)?;
    debug!(command = ?cli.command, "dispatching");

    match cli.command {
        PinCommand::PinMode { pin, mode } => report_status(link.set_pin_mode(pin, mode)?),
        PinCommand::DigitalWrite { pin, level } => report_status(link.digital_write(pin, level)?),
        PinCommand::AnalogWrite { pin, duty } => report_status(link.analog_write(pin, duty)?),
        PinCommand::DigitalRead { pin } => {
            let level = if cli.strict {
                link.try_digital_read(pin)?
            } else {
                link.digital_read(pin)?
            };
            println!("{level}");
            Ok(ExitCode::SUCCESS)
        }
        PinCommand::AnalogRead { pin } => {
            let value = if cli.strict {
                link.try_analog_read(pin)?
            } else {
                link.analog_read(pin)?
            };
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        PinCommand::ListPorts => Ok(ExitCode::SUCCESS),
    }
}

fn report_status(status: StatusCode) -> Result<ExitCode> {
    println!("code {status} ({})", status.description());
    Ok(if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
