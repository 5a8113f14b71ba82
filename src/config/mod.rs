//! Module: config
//!
//! Purpose: Build-time device description for DigOutBox.
//!
//! Architecture:
//! - One structured record per channel and per remote button; the positional
//!   parallel arrays of older firmware are folded into these records, so
//!   output/LED/invert correspondence is fixed at construction.
//! - The active board table is selected at compile time (Cargo feature),
//!   there is no runtime reconfiguration.
//! - `DeviceConfig::validate()` runs before any pin is driven. A table that
//!   fails validation must never reach the output stage.

pub mod boards;

/// Upper bound on channels a board table may declare.
pub const MAX_CHANNELS: usize = 32;

/// Upper bound on paired remote units per box.
pub const MAX_REMOTES: usize = 4;

/// One controllable digital output and its front-panel LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelDef {
    /// Pin driving the actuator.
    pub output_pin: u8,
    /// Pin driving the status LED.
    pub led_pin: u8,
    /// Off-state polarity: `true` means logical-ON is physical LOW.
    pub invert: bool,
}

/// What a remote button is wired to do.
///
/// Older firmware encoded this as a raw channel index with `-1` meaning
/// "all off" and `-2` meaning "unassigned".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteTarget {
    /// Toggle one channel.
    Channel(u8),
    /// Turn every channel off.
    AllOff,
    /// Button is consumed but does nothing.
    None,
}

/// One remote button: its target plus one RF code per paired remote unit.
///
/// A code of `0` marks an unpaired slot and never matches a received code.
#[derive(Clone, Copy, Debug)]
pub struct ButtonDef {
    pub target: RemoteTarget,
    pub codes: &'static [u32],
}

/// Immutable description of one DigOutBox build.
///
/// Constructed once as a board table in [`boards`] and passed by reference
/// to the state store and dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct DeviceConfig {
    /// Model name reported by `*IDN?`.
    pub model: &'static str,
    /// Hardware revision reported by `*IDN?`.
    pub hw_version: &'static str,
    /// Channel table, index is the logical channel number.
    pub channels: &'static [ChannelDef],
    /// Remote button table.
    pub buttons: &'static [ButtonDef],
    /// Number of paired remote units (length of every `codes` slice).
    pub num_remotes: usize,
    /// Holdoff window after an accepted RF event, in milliseconds.
    pub rf_holdoff_ms: u32,
    /// Emit diagnostics on the serial port alongside command replies.
    pub debug: bool,
    /// Hardware interlock input, if the box has one.
    pub interlock_pin: Option<u8>,
}

/// Why a board table was rejected at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Channel table is empty.
    NoChannels,
    /// Channel table exceeds [`MAX_CHANNELS`].
    TooManyChannels { count: usize },
    /// A pin appears more than once across outputs, LEDs and interlock.
    DuplicatePin { pin: u8 },
    /// A button targets a channel index past the end of the table.
    BadChannelTarget { button: usize, channel: u8 },
    /// A button's code list does not match the paired remote count.
    BadCodeCount {
        button: usize,
        expected: usize,
        found: usize,
    },
    /// Paired remote count outside `1..=MAX_REMOTES`.
    BadRemoteCount { count: usize },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::NoChannels => write!(f, "no channels configured"),
            Self::TooManyChannels { count } => {
                write!(f, "{} channels exceeds the supported maximum", count)
            }
            Self::DuplicatePin { pin } => write!(f, "pin {} assigned more than once", pin),
            Self::BadChannelTarget { button, channel } => {
                write!(f, "remote button {} targets missing channel {}", button, channel)
            }
            Self::BadCodeCount {
                button,
                expected,
                found,
            } => write!(
                f,
                "remote button {} has {} codes, expected {}",
                button, found, expected
            ),
            Self::BadRemoteCount { count } => {
                write!(f, "{} paired remotes is outside the supported range", count)
            }
        }
    }
}

impl DeviceConfig {
    /// Check the table invariants.
    ///
    /// Must pass before the output stage is initialized; a box running with
    /// an inconsistent channel mapping actuates the wrong hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.channels.len();
        if count == 0 {
            return Err(ConfigError::NoChannels);
        }
        if count > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels { count });
        }
        if self.num_remotes == 0 || self.num_remotes > MAX_REMOTES {
            return Err(ConfigError::BadRemoteCount {
                count: self.num_remotes,
            });
        }

        for (i, pin) in self.pins().enumerate() {
            if self.pins().skip(i + 1).any(|other| other == pin) {
                return Err(ConfigError::DuplicatePin { pin });
            }
        }

        for (i, button) in self.buttons.iter().enumerate() {
            if let RemoteTarget::Channel(channel) = button.target {
                if channel as usize >= count {
                    return Err(ConfigError::BadChannelTarget { button: i, channel });
                }
            }
            if button.codes.len() != self.num_remotes {
                return Err(ConfigError::BadCodeCount {
                    button: i,
                    expected: self.num_remotes,
                    found: button.codes.len(),
                });
            }
        }

        Ok(())
    }

    /// Find the button a received RF code belongs to.
    ///
    /// Scans every (button, remote-slot) pair. Code `0` never matches, it is
    /// the unpaired-slot marker in the tables.
    pub fn lookup(&self, code: u32) -> Option<(usize, &ButtonDef)> {
        if code == 0 {
            return None;
        }
        self.buttons
            .iter()
            .enumerate()
            .find(|(_, button)| button.codes.iter().any(|&c| c == code))
    }

    /// Every pin the table claims: outputs, LEDs, then interlock.
    fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.channels
            .iter()
            .flat_map(|ch| [ch.output_pin, ch.led_pin])
            .chain(self.interlock_pin)
    }
}
