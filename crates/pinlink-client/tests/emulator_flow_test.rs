//! End-to-end tests of the client against the emulated board.
//!
//! These tests exercise complete request-reply cycles through the real
//! codec and dispatcher, with the emulator standing in for the firmware.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pinlink_client::{LinkConfig, LinkError, PinLink};
use pinlink_core::{DigitalLevel, PinMode, StatusCode, StatusKind};
use pinlink_emulator::{BoardHandle, EmulatedBoard};
use pinlink_protocol::LineTerminator;
use pinlink_transport::TransportError;
use rstest::rstest;

/// Helper function to create a link over a fresh 20-pin board.
fn create_link() -> (PinLink<EmulatedBoard>, BoardHandle) {
    let (board, handle) = EmulatedBoard::new(20);
    (PinLink::new(board), handle)
}

/// Writer that appends formatted log output to a shared buffer.
#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with a subscriber that records WARN and above.
fn capture_warnings(f: impl FnOnce()) -> String {
    let writer = CaptureWriter::default();
    let make_writer = writer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || make_writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    writer.contents()
}

#[test]
fn test_set_pin_mode_output() {
    let (mut link, handle) = create_link();

    let status = link.set_pin_mode(7, PinMode::Output).unwrap();

    assert_eq!(status, StatusCode::SUCCESS);
    assert_eq!(handle.commands(), vec!["VMX PINMODE 7 OUTPUT".to_string()]);
    assert_eq!(handle.pin(7).unwrap().mode, Some(PinMode::Output));
}

#[test]
fn test_digital_write_then_read_back() {
    let (mut link, handle) = create_link();

    assert!(link.set_pin_mode(13, PinMode::Output).unwrap().is_success());
    assert!(link.digital_write(13, DigitalLevel::High).unwrap().is_success());

    assert_eq!(handle.pin(13).unwrap().output, DigitalLevel::High);
    assert_eq!(link.digital_read(13).unwrap(), DigitalLevel::High);

    link.digital_write(13, DigitalLevel::Low).unwrap();
    assert_eq!(link.digital_read(13).unwrap(), DigitalLevel::Low);
}

#[test]
fn test_digital_write_invalid_pin() {
    let (mut link, _handle) = create_link();

    let status = link.digital_write(99, DigitalLevel::High).unwrap();

    assert_eq!(status, 3);
    assert_eq!(status.kind(), Some(StatusKind::InvalidPin));
}

#[rstest]
#[case(DigitalLevel::High)]
#[case(DigitalLevel::Low)]
fn test_digital_read_input(#[case] level: DigitalLevel) {
    let (mut link, handle) = create_link();
    link.set_pin_mode(2, PinMode::Input).unwrap();
    handle.set_input(2, level);

    assert_eq!(link.digital_read(2).unwrap(), level);
    assert_eq!(handle.commands().last().unwrap(), "VMX DIGITALREAD 2");
}

#[test]
fn test_pullup_input_reads_high_when_floating() {
    let (mut link, _handle) = create_link();
    link.set_pin_mode(4, PinMode::InputPullup).unwrap();
    assert_eq!(link.digital_read(4).unwrap(), DigitalLevel::High);
}

#[test]
fn test_analog_read() {
    let (mut link, handle) = create_link();
    handle.set_analog(0, 512);

    assert_eq!(link.analog_read(0).unwrap(), 512);
    assert_eq!(handle.commands(), vec!["VMX ANALOG 0".to_string()]);
}

#[test]
fn test_analog_write() {
    let (mut link, handle) = create_link();

    assert_eq!(link.analog_write(6, 200).unwrap(), 0);
    assert_eq!(handle.pin(6).unwrap().duty, Some(200));
}

#[test]
fn test_digital_read_failure_logs_and_returns_low() {
    let (mut link, _handle) = create_link();

    let mut level = None;
    let logs = capture_warnings(|| {
        level = Some(link.digital_read(99).unwrap());
    });

    assert_eq!(level, Some(DigitalLevel::Low));
    assert!(logs.contains("digital_read failed"), "logs: {logs}");
}

#[test]
fn test_analog_read_failure_logs_and_returns_code() {
    let (mut link, _handle) = create_link();

    let mut value = None;
    let logs = capture_warnings(|| {
        value = Some(link.analog_read(99).unwrap());
    });

    assert_eq!(value, Some(3));
    assert!(logs.contains("analog_read failed"), "logs: {logs}");
}

#[test]
fn test_successful_reads_do_not_warn() {
    let (mut link, handle) = create_link();
    handle.set_analog(1, 1023);

    let logs = capture_warnings(|| {
        assert_eq!(link.analog_read(1).unwrap(), 1023);
        assert_eq!(link.digital_read(1).unwrap(), DigitalLevel::Low);
    });

    assert!(logs.is_empty(), "logs: {logs}");
}

#[test]
fn test_strict_reads_report_firmware_errors() {
    let (mut link, _handle) = create_link();

    let err = link.try_analog_read(99).unwrap_err();
    assert!(matches!(err, LinkError::Firmware { status } if status.kind() == Some(StatusKind::InvalidPin)));

    let err = link.try_digital_read(99).unwrap_err();
    assert!(matches!(err, LinkError::Firmware { .. }));
}

#[test]
fn test_noise_before_request_is_discarded() {
    let (mut link, handle) = create_link();
    handle.inject_noise(b"code 5\r\n1\r\n");
    handle.set_analog(3, 77);

    assert_eq!(link.analog_read(3).unwrap(), 77);
}

#[rstest]
#[case(LineTerminator::None)]
#[case(LineTerminator::Lf)]
#[case(LineTerminator::CrLf)]
fn test_every_terminator_reaches_the_board(#[case] terminator: LineTerminator) {
    let (board, handle) = EmulatedBoard::new(20);
    let config = LinkConfig::default().with_line_terminator(terminator);
    let mut link = PinLink::with_config(board, config).unwrap();

    link.set_pin_mode(9, PinMode::Output).unwrap();
    link.analog_write(9, 128).unwrap();

    assert_eq!(handle.pin(9).unwrap().duty, Some(128));
    assert_eq!(handle.commands().len(), 2);
}

#[test]
fn test_silent_board_times_out() {
    let (board, handle) = EmulatedBoard::new(20);
    let config = LinkConfig::default()
        .with_reply_timeout(Duration::from_millis(30))
        .with_poll_interval(Duration::from_micros(200));
    let mut link = PinLink::with_config(board, config).unwrap();
    assert!(link.set_pin_mode(13, PinMode::Output).unwrap().is_success());
    handle.set_silent(true);

    let err = link.digital_write(13, DigitalLevel::High).unwrap_err();
    assert!(matches!(err, LinkError::ReplyTimeout { duration_ms: 30 }));

    // The command still reached the board.
    assert_eq!(handle.pin(13).unwrap().output, DigitalLevel::High);

    // A late reply to the timed-out write is flushed before the next
    // request, so it cannot be taken for the read's answer.
    handle.set_silent(false);
    handle.inject_noise(b"code 0\r\n");
    assert_eq!(link.try_digital_read(13).unwrap(), DigitalLevel::High);
    assert_eq!(
        handle.commands().last().map(String::as_str),
        Some("VMX DIGITALREAD 13")
    );
}

#[test]
fn test_disconnected_board() {
    let (mut link, handle) = create_link();
    handle.disconnect();

    let err = link.analog_read(0).unwrap_err();
    assert!(matches!(
        err,
        LinkError::Transport(TransportError::Disconnected { .. })
    ));
}

#[test]
fn test_shared_link_behind_mutex() {
    let (link, handle) = create_link();
    let link = Arc::new(Mutex::new(link));

    let workers: Vec<_> = (0..4u16)
        .map(|pin| {
            let link = Arc::clone(&link);
            std::thread::spawn(move || {
                let mut link = link.lock().unwrap();
                link.analog_write(pin, pin * 10).unwrap()
            })
        })
        .collect();

    for worker in workers {
        assert!(worker.join().unwrap().is_success());
    }
    for pin in 0..4u16 {
        assert_eq!(handle.pin(pin).unwrap().duty, Some(pin * 10));
    }
}
