//! Serial line protocol for host control.
//!
//! Newline-terminated commands, SCPI-flavored mnemonics, zero heap
//! allocation. The command set matches what the DigOutBox host software
//! sends:
//!
//! | Command            | Reply                                |
//! |--------------------|--------------------------------------|
//! | `DO<n> <0\|1>`     | none on success                      |
//! | `DO<n>?`           | `0` or `1`                           |
//! | `ALLDOut?`         | comma-separated states               |
//! | `ALLOFF`           | none                                 |
//! | `*IDN?`            | `<model>,<hw>,<fw>`                  |
//! | `SWLockout <0\|1>` | none                                 |
//! | `SWLockout?`       | `0` or `1`                           |
//! | `INTERLOCKState?`  | `0` or `1`                           |
//!
//! Rejected input answers with a single `ERR:<code> <message>` line and
//! mutates nothing.

pub mod commands;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, process_line, reply_error};
pub use error::ScpiError;
pub use line_buffer::{LineBuffer, LINE_SIZE};
pub use parser::{parse_line, Request};

/// Firmware version reported by `*IDN?` (set by build.rs, includes git hash).
pub const VERSION: &str = env!("VERSION_STRING");
