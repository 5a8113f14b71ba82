//! Debug channel for DigOutBox.
//!
//! Diagnostics are pushed into a lock-free ring from anywhere in the
//! firmware and drained to the serial port by the main loop, one whole line
//! at a time, so they never tear the command/response framing. When the
//! board's debug flag is off the ring is simply not drained.
//!
//! ```text
//! dispatch, hal ──▶ DiagStream ──▶ main loop ──▶ serial
//!                   (lock-free)    (line-wise)
//! ```
//!
//! Push never blocks; a full ring drops the message and counts the drop.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Diagnostic ring size (number of entries).
pub const DIAG_BUFFER_SIZE: usize = 64;

/// Severity of a diagnostic message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum DiagLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl DiagLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagLevel::Error => "ERROR",
            DiagLevel::Warn => "WARN",
            DiagLevel::Info => "INFO",
            DiagLevel::Debug => "DEBUG",
        }
    }
}

/// A single buffered diagnostic.
#[derive(Clone, Copy)]
pub struct DiagEntry {
    /// Millisecond timestamp at push time.
    pub timestamp_ms: u32,
    /// Severity.
    pub level: DiagLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl DiagEntry {
    /// Message as text.
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("")
    }
}

/// Lock-free diagnostic ring (multiple producers, single consumer).
///
/// Producers coordinate through atomic `fetch_add` on the write index; the
/// single consumer is the main loop's drain.
pub struct DiagStream<const N: usize = DIAG_BUFFER_SIZE> {
    entries: UnsafeCell<[DiagEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: producers get unique indices via fetch_add, the single consumer
// only reads entries the producers have finished.
unsafe impl<const N: usize> Sync for DiagStream<N> {}
unsafe impl<const N: usize> Send for DiagStream<N> {}

impl<const N: usize> DiagStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "diag buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new(
                [DiagEntry {
                    timestamp_ms: 0,
                    level: DiagLevel::Info,
                    len: 0,
                    msg: [0; MAX_MSG_LEN],
                }; N],
            ),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a diagnostic (never blocks).
    ///
    /// Returns `true` if the message was queued, `false` if dropped.
    #[inline]
    pub fn push(&self, timestamp_ms: u32, level: DiagLevel, msg: &[u8]) -> bool {
        // Unique index per producer, no locks
        let write = self.write_idx.fetch_add(1, Ordering::AcqRel);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: fetch_add handed this producer a unique slot.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_ms = timestamp_ms;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        true
    }

    /// Drain the next entry (main loop only).
    #[inline]
    pub fn drain(&self) -> Option<DiagEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: single consumer, unique index
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Messages dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for DiagStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written; output past the buffer end is cut.
#[inline]
pub fn format_into(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Push a formatted diagnostic.
///
/// # Example
///
/// ```ignore
/// diag_log!(DiagLevel::Info, DIAG, now_ms, "rf code {:07} ignored", code);
/// ```
#[macro_export]
macro_rules! diag_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_into(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Error-level diagnostic.
#[macro_export]
macro_rules! diag_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::DiagLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Warning-level diagnostic.
#[macro_export]
macro_rules! diag_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::DiagLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Info-level diagnostic.
#[macro_export]
macro_rules! diag_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::DiagLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Debug-level diagnostic.
#[macro_export]
macro_rules! diag_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::diag_log!($crate::logging::DiagLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}
