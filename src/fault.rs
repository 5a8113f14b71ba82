//! Fault latch for DigOutBox.
//!
//! A box actuating outputs through an undefined channel mapping is worse
//! than a box doing nothing. When in doubt, latch a fault and keep every
//! output at its off level.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Why the box refused to (or stopped) actuating outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Board table failed validation at startup. Never cleared; the output
    /// stage is not initialized while this is set.
    ConfigInvalid = 1,

    /// GPIO or peripheral setup failed.
    HardwareFault = 2,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::ConfigInvalid,
            2 => FaultCode::HardwareFault,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault latch.
///
/// Set during startup (config validation, pin claiming) and checked by the
/// main loop before it services any event.
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// if let Err(err) = config.validate() {
///     FAULT.set(FaultCode::ConfigInvalid, 0);
///     // park without ever driving a pin
/// }
/// ```
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (e.g. the offending pin number).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault latch (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Latch a fault with the given code and detail word.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if a fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag after recovery.
    ///
    /// The counter is preserved for diagnostics. `ConfigInvalid` must never
    /// be cleared; there is no recovery from a bad table short of a new
    /// build.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_latch_basic() {
        let fault = FaultState::new();

        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);
        assert_eq!(fault.count(), 0);

        fault.set(FaultCode::ConfigInvalid, 36);

        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::ConfigInvalid);
        assert_eq!(fault.data(), 36);
        assert_eq!(fault.count(), 1);

        fault.clear();

        assert!(!fault.is_active());
        assert_eq!(fault.count(), 1); // Count preserved
    }

    #[test]
    fn test_fault_count_accumulates() {
        let fault = FaultState::new();

        fault.set(FaultCode::HardwareFault, 1);
        fault.clear();
        fault.set(FaultCode::ConfigInvalid, 2);

        assert_eq!(fault.count(), 2);
        assert_eq!(fault.code(), FaultCode::ConfigInvalid);
    }
}
