//! Command line parser
//!
//! Mnemonics are case-sensitive, matching what the shipped host software
//! sends. The channel index rides inside the `DO` token (`DO3 1`, `DO3?`).

use super::ScpiError;

/// A validated host request.
///
/// Range checking of the channel index happens at dispatch, where the
/// channel count is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    SetChannel { index: usize, on: bool },
    QueryChannel { index: usize },
    QueryAll,
    AllOff,
    Identify,
    SetLockout(bool),
    QueryLockout,
    QueryInterlock,
}

/// Parse one non-empty command line.
///
/// Tokens past the first argument are ignored.
pub fn parse_line(line: &str) -> Result<Request, ScpiError> {
    let mut parts = line.split_whitespace();
    let head = parts.next().ok_or(ScpiError::UnknownCommand)?;
    let arg = parts.next();

    match head {
        "ALLOFF" => Ok(Request::AllOff),
        "ALLDOut?" => Ok(Request::QueryAll),
        "*IDN?" => Ok(Request::Identify),
        "SWLockout" => Ok(Request::SetLockout(parse_flag(arg)?)),
        "SWLockout?" => Ok(Request::QueryLockout),
        "INTERLOCKState?" => Ok(Request::QueryInterlock),
        _ => parse_channel_command(head, arg),
    }
}

fn parse_channel_command(head: &str, arg: Option<&str>) -> Result<Request, ScpiError> {
    let rest = head.strip_prefix("DO").ok_or(ScpiError::UnknownCommand)?;

    if let Some(digits) = rest.strip_suffix('?') {
        let index = parse_index(digits)?;
        return Ok(Request::QueryChannel { index });
    }

    let index = parse_index(rest)?;
    let on = parse_flag(arg)?;
    Ok(Request::SetChannel { index, on })
}

fn parse_index(digits: &str) -> Result<usize, ScpiError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScpiError::UnknownCommand);
    }
    // All digits but too large for usize: certainly not a channel
    digits.parse().map_err(|_| ScpiError::InvalidChannel)
}

fn parse_flag(arg: Option<&str>) -> Result<bool, ScpiError> {
    match arg.ok_or(ScpiError::MissingArg)? {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ScpiError::InvalidValue),
    }
}
