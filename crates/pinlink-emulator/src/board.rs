//! Pin table and command execution.
//!
//! The [`Board`] keeps one [`PinState`] per digital pin and executes parsed
//! commands against it, producing the reply line the firmware would print.
//!
//! # Status Mapping
//!
//! | Condition | Reply |
//! |---|---|
//! | write-class command applied | `code 0` |
//! | first token is not `VMX` | `code 2` |
//! | pin number outside the board | `code 3` |
//! | unknown pin mode | `code 4` |
//! | unknown operation or malformed argument | `code 5` |
//! | `DIGITALREAD` | `0` or `1` |
//! | `ANALOG` / `ANALOGREAD` | ADC value |
//!
//! # Examples
//!
//! ```
//! use pinlink_emulator::Board;
//!
//! let mut board = Board::new(20);
//! assert_eq!(board.execute("VMX PINMODE 13 OUTPUT"), "code 0");
//! assert_eq!(board.execute("VMX DIGITALWRITE 13 HIGH"), "code 0");
//! assert_eq!(board.execute("VMX DIGITALREAD 13"), "1");
//! assert_eq!(board.execute("VMX DIGITALREAD 40"), "code 3");
//! ```

use pinlink_core::constants::{MAX_PWM_DUTY, STATUS_PREFIX};
use pinlink_core::{DigitalLevel, Error, PinMode, StatusCode, StatusKind};
use pinlink_protocol::Command;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// State of one emulated pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PinState {
    /// Mode set by the last `PINMODE`, `None` before any.
    pub mode: Option<PinMode>,

    /// Level driven by the last `DIGITALWRITE`.
    pub output: DigitalLevel,

    /// Externally applied level, `None` when floating.
    pub input: Option<DigitalLevel>,

    /// Duty set by the last `ANALOGWRITE`, saturated at full scale.
    pub duty: Option<u16>,

    /// Value returned by an analog read.
    pub adc: i32,
}

impl PinState {
    /// Level a `digitalRead` would observe.
    ///
    /// Output pins read back what they drive; a floating pull-up input reads
    /// HIGH and a floating plain input reads LOW.
    pub fn level(&self) -> DigitalLevel {
        match (self.mode, self.input) {
            (Some(PinMode::Output), _) => self.output,
            (_, Some(level)) => level,
            (Some(PinMode::InputPullup), None) => DigitalLevel::High,
            _ => DigitalLevel::Low,
        }
    }
}

/// Emulated pin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pins: Vec<PinState>,
}

impl Board {
    /// Create a board with `pin_count` digital pins.
    pub fn new(pin_count: u16) -> Self {
        Self {
            pins: vec![PinState::default(); usize::from(pin_count)],
        }
    }

    pub fn pin_count(&self) -> u16 {
        self.pins.len() as u16
    }

    pub fn pin(&self, pin: u16) -> Option<&PinState> {
        self.pins.get(usize::from(pin))
    }

    pub fn pin_mut(&mut self, pin: u16) -> Option<&mut PinState> {
        self.pins.get_mut(usize::from(pin))
    }

    /// Execute one command line and return the reply, without terminator.
    pub fn execute(&mut self, line: &str) -> String {
        let reply = match Command::parse(line) {
            Ok(command) => self.apply(command),
            Err(error) => status_reply(status_for(&error)),
        };
        debug!(command = line.trim_end(), reply = %reply, "emulated board executed command");
        reply
    }

    fn apply(&mut self, command: Command) -> String {
        let Some(state) = self.pin_mut(command.pin().as_u16()) else {
            return status_reply(StatusKind::InvalidPin);
        };

        match command {
            Command::PinMode { mode, .. } => {
                state.mode = Some(mode);
                status_reply(StatusKind::Success)
            }
            Command::DigitalWrite { level, .. } => {
                state.output = level;
                status_reply(StatusKind::Success)
            }
            Command::AnalogWrite { duty, .. } => {
                // analogWrite saturates: anything past full scale is always on
                state.duty = Some(duty.min(MAX_PWM_DUTY));
                status_reply(StatusKind::Success)
            }
            Command::DigitalRead { .. } => u8::from(state.level().is_high()).to_string(),
            Command::AnalogRead { .. } => state.adc.to_string(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(pinlink_core::constants::DEFAULT_PIN_COUNT)
    }
}

fn status_for(error: &Error) -> StatusKind {
    match error {
        Error::MissingFramingTag(_) => StatusKind::MissingFramingTag,
        Error::InvalidPin(_) => StatusKind::InvalidPin,
        Error::InvalidPinMode(_) => StatusKind::InvalidPinMode,
        _ => StatusKind::InvalidCommand,
    }
}

fn status_reply(kind: StatusKind) -> String {
    format!("{STATUS_PREFIX}{}", StatusCode::from(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ARD PINMODE 7 OUTPUT", "code 2")]
    #[case("VMX PINMODE 25 OUTPUT", "code 3")]
    #[case("VMX PINMODE x OUTPUT", "code 3")]
    #[case("VMX PINMODE 7 PULLDOWN", "code 4")]
    #[case("VMX SERVO 7 90", "code 5")]
    #[case("VMX DIGITALWRITE 7 ON", "code 5")]
    #[case("VMX ANALOGWRITE 7", "code 5")]
    #[case("VMX PINMODE 7 OUTPUT", "code 0")]
    fn test_status_replies(#[case] line: &str, #[case] expected: &str) {
        let mut board = Board::new(20);
        assert_eq!(board.execute(line), expected);
    }

    #[test]
    fn test_write_commands_update_state() {
        let mut board = Board::new(20);
        board.execute("VMX PINMODE 13 OUTPUT");
        board.execute("VMX DIGITALWRITE 13 HIGH");
        board.execute("VMX ANALOGWRITE 6 200");

        let pin = board.pin(13).unwrap();
        assert_eq!(pin.mode, Some(PinMode::Output));
        assert_eq!(pin.output, DigitalLevel::High);
        assert_eq!(board.pin(6).unwrap().duty, Some(200));
    }

    #[rstest]
    #[case(255, 255)]
    #[case(256, 255)]
    #[case(1000, 255)]
    fn test_pwm_duty_saturates(#[case] duty: u16, #[case] stored: u16) {
        let mut board = Board::new(20);
        assert_eq!(board.execute(&format!("VMX ANALOGWRITE 6 {duty}")), "code 0");
        assert_eq!(board.pin(6).unwrap().duty, Some(stored));
    }

    #[test]
    fn test_every_mode_is_accepted() {
        let mut board = Board::new(PinMode::ALL.len() as u16);
        for (pin, mode) in PinMode::ALL.into_iter().enumerate() {
            let line = format!("VMX PINMODE {pin} {mode}");
            assert_eq!(board.execute(&line), "code 0");
            assert_eq!(board.pin(pin as u16).unwrap().mode, Some(mode));
        }
    }

    #[rstest]
    #[case(None, None, DigitalLevel::Low)]
    #[case(Some(PinMode::Input), Some(DigitalLevel::High), DigitalLevel::High)]
    #[case(Some(PinMode::InputPullup), None, DigitalLevel::High)]
    #[case(Some(PinMode::InputPullup), Some(DigitalLevel::Low), DigitalLevel::Low)]
    fn test_input_levels(
        #[case] mode: Option<PinMode>,
        #[case] input: Option<DigitalLevel>,
        #[case] expected: DigitalLevel,
    ) {
        let state = PinState {
            mode,
            input,
            ..PinState::default()
        };
        assert_eq!(state.level(), expected);
    }

    #[test]
    fn test_analog_read_spellings() {
        let mut board = Board::new(20);
        board.pin_mut(0).unwrap().adc = 512;
        assert_eq!(board.execute("VMX ANALOG 0"), "512");
        assert_eq!(board.execute("VMX ANALOGREAD 0\r\n"), "512");
    }

    #[test]
    fn test_default_board_size() {
        assert_eq!(Board::default().pin_count(), 20);
    }

    #[test]
    fn test_state_serializes() {
        let mut board = Board::new(2);
        board.execute("VMX PINMODE 1 INPUT_PULLUP");
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["pins"][1]["mode"], "INPUT_PULLUP");
    }
}
