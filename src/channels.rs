//! Channel state store and the output seam.
//!
//! `ChannelBank` owns the logical on/off state of every channel and is the
//! only writer of output and LED pins. The GPIO layer is reached through
//! [`OutputBus`], so the store itself never touches a peripheral register.

use heapless::Vec;

use crate::config::{DeviceConfig, MAX_CHANNELS};

/// Physical line level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// HIGH for `true`, LOW for `false`.
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Contract with the GPIO layer: write physical level L to pin P.
///
/// Implemented by the ESP-IDF pin bank on the device and by in-memory
/// recorders in the test suites.
pub trait OutputBus {
    fn set_level(&mut self, pin: u8, level: Level);
}

/// Logical on/off state per channel, invert-aware on the way out.
///
/// The LED always shows the logical state; `invert` only affects the
/// actuator pin.
pub struct ChannelBank<'a> {
    config: &'a DeviceConfig,
    states: Vec<bool, MAX_CHANNELS>,
}

impl<'a> ChannelBank<'a> {
    /// Create the bank with every channel logically off.
    ///
    /// No pins are touched until [`init`](Self::init) runs. The config must
    /// have passed [`DeviceConfig::validate`], which bounds the channel
    /// count by `MAX_CHANNELS`.
    pub fn new(config: &'a DeviceConfig) -> Self {
        let mut states = Vec::new();
        let _ = states.resize_default(config.channels.len());
        Self { config, states }
    }

    /// Drive every output to its off level and every LED low.
    ///
    /// Runs once at startup, before any event is accepted.
    pub fn init<B: OutputBus>(&mut self, bus: &mut B) {
        self.set_all(false, bus);
    }

    /// Number of channels in the bank.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Set one channel and drive its pins.
    ///
    /// Output level is `on XOR invert`; LED level is the logical state.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Channel count is fixed at build
    /// time, so an out-of-range index here is a dispatcher bug.
    pub fn set<B: OutputBus>(&mut self, index: usize, on: bool, bus: &mut B) {
        let channel = &self.config.channels[index];
        self.states[index] = on;
        bus.set_level(channel.output_pin, Level::from_bool(on != channel.invert));
        bus.set_level(channel.led_pin, Level::from_bool(on));
    }

    /// Read one channel's logical state.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, as in [`set`](Self::set).
    pub fn get(&self, index: usize) -> bool {
        self.states[index]
    }

    /// Apply one logical state to every channel.
    pub fn set_all<B: OutputBus>(&mut self, on: bool, bus: &mut B) {
        for index in 0..self.states.len() {
            self.set(index, on, bus);
        }
    }

    /// Logical states in channel order.
    pub fn states(&self) -> impl Iterator<Item = bool> + '_ {
        self.states.iter().copied()
    }
}
