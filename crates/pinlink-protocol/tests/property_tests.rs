//! Property-based tests for the line codec.
//!
//! These tests use proptest to generate commands and reply lines and verify
//! that the framing rules hold for every input, not just the documented
//! examples.

use pinlink_core::{DigitalLevel, Pin, PinMode};
use pinlink_protocol::{Command, LineReader, Reply};
use proptest::prelude::*;

/// Strategy for generating pin modes.
fn pin_mode() -> impl Strategy<Value = PinMode> {
    prop_oneof![
        Just(PinMode::Input),
        Just(PinMode::Output),
        Just(PinMode::InputPullup),
    ]
}

/// Strategy for generating digital levels.
fn digital_level() -> impl Strategy<Value = DigitalLevel> {
    prop_oneof![Just(DigitalLevel::Low), Just(DigitalLevel::High)]
}

/// Strategy for generating any command record.
fn command() -> impl Strategy<Value = Command> {
    let pin = any::<u16>().prop_map(Pin::new);
    prop_oneof![
        (pin.clone(), pin_mode()).prop_map(|(pin, mode)| Command::PinMode { pin, mode }),
        (pin.clone(), digital_level()).prop_map(|(pin, level)| Command::DigitalWrite { pin, level }),
        pin.clone().prop_map(|pin| Command::DigitalRead { pin }),
        (pin.clone(), any::<u16>()).prop_map(|(pin, duty)| Command::AnalogWrite { pin, duty }),
        pin.prop_map(|pin| Command::AnalogRead { pin }),
    ]
}

/// Strategy for reply payloads: printable ASCII, no terminator, and no
/// trailing carriage return.
fn reply_payload() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,40}").expect("Failed to create payload regex strategy")
}

proptest! {
    /// Property: command lines are one line of single-space-separated
    /// tokens starting with the framing tag.
    #[test]
    fn prop_command_line_shape(cmd in command()) {
        let line = cmd.encode();

        prop_assert!(line.is_ascii());
        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains("  "));
        prop_assert!(line.starts_with("VMX "));
        prop_assert_eq!(line.matches("VMX").count(), 1);
        prop_assert_eq!(line.split(' ').nth(1), Some(cmd.kind().as_str()));
    }

    /// Property: the firmware-side parser recovers what the client encoded.
    #[test]
    fn prop_firmware_parses_client_commands(cmd in command()) {
        prop_assert_eq!(Command::parse(&cmd.encode()).unwrap(), cmd);
    }

    /// Property: `code N` and `N` parse to the same integer.
    #[test]
    fn prop_status_prefix_is_transparent(n in any::<i32>()) {
        let prefixed = Reply::new(format!("code {n}"));
        let bare = Reply::new(n.to_string());

        prop_assert!(prefixed.is_status());
        prop_assert!(!bare.is_status());
        prop_assert_eq!(prefixed.parse_int().unwrap(), n);
        prop_assert_eq!(bare.parse_int().unwrap(), n);
    }

    /// Property: the reader yields exactly the bytes before the first
    /// newline and nothing before it arrives.
    #[test]
    fn prop_reader_stops_at_first_newline(payload in reply_payload(), tail in reply_payload()) {
        let mut reader = LineReader::new();

        for byte in payload.bytes() {
            prop_assert!(reader.push(byte).unwrap().is_none());
        }
        let reply = reader.push(b'\n').unwrap();
        prop_assert_eq!(reply, Some(Reply::new(payload.trim_end_matches('\r'))));

        for byte in tail.bytes() {
            prop_assert!(reader.push(byte).unwrap().is_none());
        }
    }

    /// Property: only the exact payload `1` reads as HIGH.
    #[test]
    fn prop_only_one_is_high(payload in reply_payload()) {
        let level = Reply::new(payload.clone()).parse_level();
        prop_assert_eq!(level == DigitalLevel::High, payload == "1");
    }
}
