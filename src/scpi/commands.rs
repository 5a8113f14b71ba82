//! Request execution against the dispatcher

use core::fmt::Write;

use super::parser::{parse_line, Request};
use super::{ScpiError, VERSION};
use crate::channels::OutputBus;
use crate::dispatch::Dispatcher;

/// Execute one complete command line and write any reply to `out`.
///
/// Empty lines are ignored. On `Err` nothing was mutated; the caller
/// decides whether to answer with [`reply_error`] (the firmware does) or
/// just log it.
pub fn process_line<B: OutputBus>(
    line: &str,
    dispatcher: &mut Dispatcher<'_>,
    bus: &mut B,
    out: &mut dyn Write,
) -> Result<(), ScpiError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    let request = parse_line(line)?;
    execute(&request, dispatcher, bus, out)
}

/// Execute a parsed request.
///
/// Set-type requests reply nothing on success; the host only reads a line
/// back after queries.
pub fn execute<B: OutputBus>(
    request: &Request,
    dispatcher: &mut Dispatcher<'_>,
    bus: &mut B,
    out: &mut dyn Write,
) -> Result<(), ScpiError> {
    match *request {
        Request::SetChannel { index, on } => {
            dispatcher.set_channel(index, on, bus)?;
            Ok(())
        }
        Request::QueryChannel { index } => {
            let on = dispatcher.channel(index)?;
            let _ = writeln!(out, "{}", on as u8);
            Ok(())
        }
        Request::QueryAll => {
            for (i, on) in dispatcher.states().enumerate() {
                let sep = if i == 0 { "" } else { "," };
                let _ = write!(out, "{}{}", sep, on as u8);
            }
            let _ = writeln!(out);
            Ok(())
        }
        Request::AllOff => {
            dispatcher.all_off(bus);
            Ok(())
        }
        Request::Identify => {
            let config = dispatcher.config();
            let _ = writeln!(out, "{},{},{}", config.model, config.hw_version, VERSION);
            Ok(())
        }
        Request::SetLockout(engaged) => {
            dispatcher.set_lockout(engaged);
            Ok(())
        }
        Request::QueryLockout => {
            let _ = writeln!(out, "{}", dispatcher.lockout() as u8);
            Ok(())
        }
        Request::QueryInterlock => {
            let _ = writeln!(out, "{}", dispatcher.interlock() as u8);
            Ok(())
        }
    }
}

/// Single-line error reply. Rejected input answers, it does not go silent
/// and leave the host waiting on a query that will never print.
pub fn reply_error(error: ScpiError, out: &mut dyn Write) {
    let _ = writeln!(out, "ERR:{} {}", error.code(), error.message());
}
