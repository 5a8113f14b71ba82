//! Serial protocol tests: parsing, replies, error responses, line assembly.

use digoutbox::channels::{Level, OutputBus};
use digoutbox::config::boards;
use digoutbox::dispatch::Dispatcher;
use digoutbox::scpi::{self, parse_line, LineBuffer, Request, ScpiError};

struct NullBus;

impl OutputBus for NullBus {
    fn set_level(&mut self, _pin: u8, _level: Level) {}
}

fn dispatcher() -> Dispatcher<'static> {
    let mut dispatcher = Dispatcher::new(&boards::DIGOUTBOX16);
    dispatcher.init(&mut NullBus);
    dispatcher
}

fn run(line: &str, dispatcher: &mut Dispatcher<'_>) -> (Result<(), ScpiError>, String) {
    let mut out = String::new();
    let result = scpi::process_line(line, dispatcher, &mut NullBus, &mut out);
    (result, out)
}

// --- Parsing ---

#[test]
fn test_parse_set_channel() {
    assert_eq!(
        parse_line("DO3 1"),
        Ok(Request::SetChannel { index: 3, on: true })
    );
    assert_eq!(
        parse_line("DO12 0"),
        Ok(Request::SetChannel { index: 12, on: false })
    );
}

#[test]
fn test_parse_query_channel() {
    assert_eq!(parse_line("DO3?"), Ok(Request::QueryChannel { index: 3 }));
}

#[test]
fn test_parse_fixed_commands() {
    assert_eq!(parse_line("ALLOFF"), Ok(Request::AllOff));
    assert_eq!(parse_line("ALLDOut?"), Ok(Request::QueryAll));
    assert_eq!(parse_line("*IDN?"), Ok(Request::Identify));
    assert_eq!(parse_line("SWLockout 1"), Ok(Request::SetLockout(true)));
    assert_eq!(parse_line("SWLockout?"), Ok(Request::QueryLockout));
    assert_eq!(parse_line("INTERLOCKState?"), Ok(Request::QueryInterlock));
}

#[test]
fn test_parse_tolerates_extra_whitespace() {
    assert_eq!(
        parse_line("  DO3   1  "),
        Ok(Request::SetChannel { index: 3, on: true })
    );
}

#[test]
fn test_parse_unknown_mnemonic() {
    assert_eq!(parse_line("foobar"), Err(ScpiError::UnknownCommand));
    assert_eq!(parse_line("DO 1"), Err(ScpiError::UnknownCommand));
    assert_eq!(parse_line("DOx?"), Err(ScpiError::UnknownCommand));
    // Case-sensitive, as sent by the shipped host software
    assert_eq!(parse_line("alloff"), Err(ScpiError::UnknownCommand));
}

#[test]
fn test_parse_missing_and_bad_arguments() {
    assert_eq!(parse_line("DO3"), Err(ScpiError::MissingArg));
    assert_eq!(parse_line("SWLockout"), Err(ScpiError::MissingArg));
    assert_eq!(parse_line("DO3 2"), Err(ScpiError::InvalidValue));
    assert_eq!(parse_line("DO3 on"), Err(ScpiError::InvalidValue));
}

// --- Execution ---

#[test]
fn test_set_is_silent_and_query_answers() {
    let mut dispatcher = dispatcher();

    let (result, out) = run("DO3 1", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "");

    let (result, out) = run("DO3?", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "1\n");

    let (_, out) = run("DO4?", &mut dispatcher);
    assert_eq!(out, "0\n");
}

#[test]
fn test_query_all_is_comma_separated_in_channel_order() {
    let mut dispatcher = dispatcher();

    run("DO0 1", &mut dispatcher);
    run("DO15 1", &mut dispatcher);

    let (result, out) = run("ALLDOut?", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1\n");
}

#[test]
fn test_alloff_clears_everything() {
    let mut dispatcher = dispatcher();

    run("DO2 1", &mut dispatcher);
    run("DO7 1", &mut dispatcher);
    let (result, out) = run("ALLOFF", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "");

    let (_, out) = run("ALLDOut?", &mut dispatcher);
    assert_eq!(out, "0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n");
}

#[test]
fn test_identify_reports_model_and_versions() {
    let mut dispatcher = dispatcher();

    let (result, out) = run("*IDN?", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert!(out.starts_with("DigOutBox,v0.1.0,"));
    assert!(out.trim_end().ends_with(scpi::VERSION));
}

#[test]
fn test_channel_out_of_range_is_rejected_with_e04() {
    let mut dispatcher = dispatcher();

    let (result, out) = run("DO99 1", &mut dispatcher);
    assert_eq!(result, Err(ScpiError::InvalidChannel));
    assert_eq!(out, "");

    let mut reply = String::new();
    scpi::reply_error(result.unwrap_err(), &mut reply);
    assert_eq!(reply, "ERR:E04 channel out of range\n");

    // Nothing was mutated
    let (_, out) = run("ALLDOut?", &mut dispatcher);
    assert!(!out.contains('1'));
}

#[test]
fn test_lockout_round_trip() {
    let mut dispatcher = dispatcher();

    let (_, out) = run("SWLockout?", &mut dispatcher);
    assert_eq!(out, "0\n");

    let (result, out) = run("SWLockout 1", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "");

    let (_, out) = run("SWLockout?", &mut dispatcher);
    assert_eq!(out, "1\n");
}

#[test]
fn test_interlock_query_reports_clear() {
    let mut dispatcher = dispatcher();

    let (result, out) = run("INTERLOCKState?", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "0\n");
}

#[test]
fn test_empty_line_is_ignored() {
    let mut dispatcher = dispatcher();

    let (result, out) = run("", &mut dispatcher);
    assert_eq!(result, Ok(()));
    assert_eq!(out, "");
}

// --- Line assembly ---

#[test]
fn test_line_buffer_completes_on_newline() {
    let mut line = LineBuffer::new();

    for &byte in b"DO3 1" {
        assert!(!line.feed(byte));
    }
    assert!(line.feed(b'\n'));
    assert_eq!(line.line(), Ok("DO3 1"));

    line.clear();
    assert!(line.is_empty());
}

#[test]
fn test_line_buffer_swallows_carriage_return() {
    let mut line = LineBuffer::new();

    for &byte in b"ALLOFF\r" {
        assert!(!line.feed(byte));
    }
    assert!(line.feed(b'\n'));
    assert_eq!(line.line(), Ok("ALLOFF"));
}

#[test]
fn test_line_buffer_rejects_overlong_line_whole() {
    let mut line = LineBuffer::new();

    for _ in 0..100 {
        line.feed(b'A');
    }
    assert!(line.feed(b'\n'));
    assert_eq!(line.line(), Err(ScpiError::LineTooLong));

    // Recovers after clear
    line.clear();
    for &byte in b"DO0?" {
        line.feed(byte);
    }
    assert!(line.feed(b'\n'));
    assert_eq!(line.line(), Ok("DO0?"));
}

#[test]
fn test_serial_byte_stream_end_to_end() {
    let mut dispatcher = dispatcher();
    let mut bus = NullBus;
    let mut line = LineBuffer::new();
    let mut out = String::new();

    // Two commands and one reject, as one byte stream
    for &byte in b"DO5 1\nDO5?\nDO99?\n" {
        if line.feed(byte) {
            let result = line
                .line()
                .and_then(|text| scpi::process_line(text, &mut dispatcher, &mut bus, &mut out));
            if let Err(error) = result {
                scpi::reply_error(error, &mut out);
            }
            line.clear();
        }
    }

    assert_eq!(out, "1\nERR:E04 channel out of range\n");
}
