//! Command dispatcher: one inbound event in, at most one mutation out.
//!
//! Both event sources, the RF remote and the host serial channel, funnel
//! through this type. The main loop feeds it one event per iteration, so a
//! mutation always runs to completion (output write plus LED write) before
//! the next event is considered.
//!
//! Remote-button policy: a button mapped to a channel **toggles** it. A
//! press on an already-ON channel turns it off, a second press turns it
//! back on.

use crate::channels::{ChannelBank, OutputBus};
use crate::config::{DeviceConfig, RemoteTarget};
use crate::rf::RfEvent;

/// What an RF event ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RfOutcome {
    /// Button toggled a channel; `on` is the new logical state.
    Toggled { channel: usize, on: bool },
    /// ALL-OFF button: every channel is now off.
    AllOff,
    /// Unassigned button: consumed, nothing mutated.
    Accepted,
    /// Event arrived inside the holdoff window and was ignored.
    Suppressed,
    /// Software lockout is engaged; remote input is ignored.
    LockedOut,
    /// Code matched no (button, remote-slot) pair.
    UnknownCode,
    /// Toggle would have turned a channel on while the interlock is
    /// tripped.
    InterlockBlocked { channel: usize },
}

/// Why a host request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// Channel index past the end of the channel table.
    InvalidChannel { index: usize },
    /// Request would turn a channel on while the interlock is tripped.
    InterlockActive,
}

/// Serialization point for every channel mutation.
///
/// Owns the channel state store plus the RF holdoff timer, the software
/// lockout flag and the interlock latch.
pub struct Dispatcher<'a> {
    config: &'a DeviceConfig,
    bank: ChannelBank<'a>,
    /// Timestamp of the last accepted RF event; one global window, not
    /// per-button.
    last_rf_ms: Option<u32>,
    sw_lockout: bool,
    interlock: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a DeviceConfig) -> Self {
        Self {
            config,
            bank: ChannelBank::new(config),
            last_rf_ms: None,
            sw_lockout: false,
            interlock: false,
        }
    }

    /// Drive every channel to its off state. Runs once at startup.
    pub fn init<B: OutputBus>(&mut self, bus: &mut B) {
        self.bank.init(bus);
    }

    /// The board table this dispatcher runs with.
    pub fn config(&self) -> &DeviceConfig {
        self.config
    }

    /// Handle one decoded RF event.
    ///
    /// Holdoff first: any event within `rf_holdoff_ms` of the last accepted
    /// one is suppressed, which swallows the repeat bursts a held-down
    /// remote button transmits. Accepted events (including unassigned
    /// buttons) re-arm the window; unknown codes do not.
    pub fn handle_rf<B: OutputBus>(&mut self, event: RfEvent, bus: &mut B) -> RfOutcome {
        if let Some(last) = self.last_rf_ms {
            if event.timestamp_ms.wrapping_sub(last) < self.config.rf_holdoff_ms {
                return RfOutcome::Suppressed;
            }
        }

        if self.sw_lockout {
            return RfOutcome::LockedOut;
        }

        let Some((_, button)) = self.config.lookup(event.code) else {
            return RfOutcome::UnknownCode;
        };

        self.last_rf_ms = Some(event.timestamp_ms);

        match button.target {
            RemoteTarget::Channel(channel) => {
                let index = channel as usize;
                let on = !self.bank.get(index);
                if on && self.interlock {
                    return RfOutcome::InterlockBlocked { channel: index };
                }
                self.bank.set(index, on, bus);
                RfOutcome::Toggled { channel: index, on }
            }
            RemoteTarget::AllOff => {
                self.bank.set_all(false, bus);
                RfOutcome::AllOff
            }
            RemoteTarget::None => RfOutcome::Accepted,
        }
    }

    /// Host request: set one channel.
    pub fn set_channel<B: OutputBus>(
        &mut self,
        index: usize,
        on: bool,
        bus: &mut B,
    ) -> Result<(), DispatchError> {
        if index >= self.bank.len() {
            return Err(DispatchError::InvalidChannel { index });
        }
        if on && self.interlock {
            return Err(DispatchError::InterlockActive);
        }
        self.bank.set(index, on, bus);
        Ok(())
    }

    /// Host request: read one channel's logical state.
    pub fn channel(&self, index: usize) -> Result<bool, DispatchError> {
        if index >= self.bank.len() {
            return Err(DispatchError::InvalidChannel { index });
        }
        Ok(self.bank.get(index))
    }

    /// Host request: every channel off.
    pub fn all_off<B: OutputBus>(&mut self, bus: &mut B) {
        self.bank.set_all(false, bus);
    }

    /// Logical states in channel order.
    pub fn states(&self) -> impl Iterator<Item = bool> + '_ {
        self.bank.states()
    }

    /// Number of channels on this build.
    pub fn num_channels(&self) -> usize {
        self.bank.len()
    }

    /// Engage or release the software lockout. While engaged the remote is
    /// dead; host commands are unaffected.
    pub fn set_lockout(&mut self, engaged: bool) {
        self.sw_lockout = engaged;
    }

    pub fn lockout(&self) -> bool {
        self.sw_lockout
    }

    /// Feed the polled interlock input level.
    ///
    /// A trip forces every channel off once; while tripped, nothing may be
    /// turned on. Clearing the input releases the latch without restoring
    /// previous states.
    pub fn update_interlock<B: OutputBus>(&mut self, tripped: bool, bus: &mut B) {
        if tripped && !self.interlock {
            self.bank.set_all(false, bus);
        }
        self.interlock = tripped;
    }

    pub fn interlock(&self) -> bool {
        self.interlock
    }
}
