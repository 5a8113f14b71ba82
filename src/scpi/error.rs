//! Protocol error types

use crate::dispatch::DispatchError;

/// Why a command line was rejected, with host-facing code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScpiError {
    /// E01: Unknown mnemonic
    UnknownCommand,
    /// E02: Argument is not a valid value
    InvalidValue,
    /// E03: Missing required argument
    MissingArg,
    /// E04: Channel index out of range
    InvalidChannel,
    /// E05: Interlock is tripped, channel may not be turned on
    InterlockActive,
    /// E06: Line exceeded the input buffer
    LineTooLong,
}

impl ScpiError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidValue => "E02",
            Self::MissingArg => "E03",
            Self::InvalidChannel => "E04",
            Self::InterlockActive => "E05",
            Self::LineTooLong => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidValue => "invalid value",
            Self::MissingArg => "missing argument",
            Self::InvalidChannel => "channel out of range",
            Self::InterlockActive => "interlock active",
            Self::LineTooLong => "line too long",
        }
    }
}

impl From<DispatchError> for ScpiError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::InvalidChannel { .. } => Self::InvalidChannel,
            DispatchError::InterlockActive => Self::InterlockActive,
        }
    }
}

impl core::fmt::Display for ScpiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
