//! # DigOutBox
//!
//! Firmware core for a box of digital output channels switched by a paired
//! RF remote or by a host over a serial SCPI-style protocol.
//!
//! ## Architecture
//!
//! One interrupt source, one main loop:
//! - The RF receiver ISR timestamps decoded codes and pushes them into a
//!   lock-free [`RfEventQueue`]; it never touches channel state.
//! - The main loop feeds the [`Dispatcher`] one event per iteration, RF or
//!   serial, so at most one channel mutation is ever in flight.
//! - All tables are compile-time constants, validated before any pin is
//!   driven; a bad table latches a [`FaultState`] and the outputs stay at
//!   their off levels forever.
//!
//! Hardware is reached through narrow seams (the [`OutputBus`] trait, the
//! ISR hook, byte I/O), so everything above `hal` runs and tests on the
//! host.

#![cfg_attr(not(test), no_std)]

pub mod channels;
pub mod config;
pub mod dispatch;
pub mod fault;
pub mod logging;
pub mod rf;
pub mod scpi;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use channels::{ChannelBank, Level, OutputBus};
pub use config::{ButtonDef, ChannelDef, ConfigError, DeviceConfig, RemoteTarget};
pub use dispatch::{DispatchError, Dispatcher, RfOutcome};
pub use fault::{FaultCode, FaultState};
pub use logging::{DiagLevel, DiagStream};
pub use rf::{RfEvent, RfEventQueue};
pub use scpi::ScpiError;
