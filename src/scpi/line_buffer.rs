//! Line assembly for serial input

use heapless::Vec;

use super::ScpiError;

/// Longest accepted command line. The longest real command is well under
/// half of this.
pub const LINE_SIZE: usize = 64;

/// Accumulates serial bytes until a line terminator.
///
/// An overlong line is not truncated into a shorter, possibly valid
/// command; it is flagged and rejected whole when the terminator arrives.
pub struct LineBuffer {
    buf: Vec<u8, LINE_SIZE>,
    overflowed: bool,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one serial byte. Returns `true` when a full line is buffered;
    /// consume it with [`line`](Self::line) and then [`clear`](Self::clear).
    pub fn feed(&mut self, byte: u8) -> bool {
        match byte {
            b'\n' => true,
            // CR before LF from CRLF hosts; the LF completes the line
            b'\r' => false,
            0x20..=0x7E => {
                if self.buf.push(byte).is_err() {
                    self.overflowed = true;
                }
                false
            }
            // Anything else is line noise
            _ => false,
        }
    }

    /// The completed line, or the overflow rejection.
    pub fn line(&self) -> Result<&str, ScpiError> {
        if self.overflowed {
            return Err(ScpiError::LineTooLong);
        }
        Ok(core::str::from_utf8(&self.buf).unwrap_or(""))
    }

    /// Reset for the next line
    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
