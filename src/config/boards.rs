//! Board tables for the DigOutBox builds in the field.
//!
//! Exactly one board feature must be enabled; `ACTIVE` is the table the
//! firmware binary runs with.

use super::{ButtonDef, ChannelDef, DeviceConfig, RemoteTarget};

#[cfg(all(feature = "board-digoutbox16", feature = "board-llnl001"))]
compile_error!("enable exactly one board feature");

#[cfg(not(any(feature = "board-digoutbox16", feature = "board-llnl001")))]
compile_error!("enable one board feature (board-digoutbox16 or board-llnl001)");

/// Board table the firmware was built for.
#[cfg(feature = "board-digoutbox16")]
pub static ACTIVE: &DeviceConfig = &DIGOUTBOX16;

/// Board table the firmware was built for.
#[cfg(feature = "board-llnl001")]
pub static ACTIVE: &DeviceConfig = &LLNL001;

// Front panel order: A, B, C, D, E, F, G, H, 1, 2, 3, 4, 5, 6, 7, 8.
// All channels are off-state HIGH on this hardware, so every entry inverts.
const MEGA_CHANNELS: &[ChannelDef] = &[
    ChannelDef { output_pin: 36, led_pin: 37, invert: true },
    ChannelDef { output_pin: 34, led_pin: 35, invert: true },
    ChannelDef { output_pin: 32, led_pin: 33, invert: true },
    ChannelDef { output_pin: 30, led_pin: 31, invert: true },
    ChannelDef { output_pin: 28, led_pin: 29, invert: true },
    ChannelDef { output_pin: 26, led_pin: 27, invert: true },
    ChannelDef { output_pin: 24, led_pin: 25, invert: true },
    ChannelDef { output_pin: 22, led_pin: 23, invert: true },
    ChannelDef { output_pin: 52, led_pin: 53, invert: true },
    ChannelDef { output_pin: 50, led_pin: 51, invert: true },
    ChannelDef { output_pin: 48, led_pin: 49, invert: true },
    ChannelDef { output_pin: 46, led_pin: 47, invert: true },
    ChannelDef { output_pin: 44, led_pin: 45, invert: true },
    ChannelDef { output_pin: 42, led_pin: 43, invert: true },
    ChannelDef { output_pin: 40, led_pin: 41, invert: true },
    ChannelDef { output_pin: 38, led_pin: 39, invert: true },
];

/// Standard 16-channel box, one paired hand remote.
///
/// The second code slot on every button is unpaired.
pub static DIGOUTBOX16: DeviceConfig = DeviceConfig {
    model: "DigOutBox",
    hw_version: "v0.1.0",
    channels: MEGA_CHANNELS,
    buttons: &[
        ButtonDef { target: RemoteTarget::Channel(0), codes: &[4543795, 0] },
        ButtonDef { target: RemoteTarget::Channel(1), codes: &[4543804, 0] },
        ButtonDef { target: RemoteTarget::Channel(2), codes: &[4543939, 0] },
        ButtonDef { target: RemoteTarget::Channel(3), codes: &[4543948, 0] },
        ButtonDef { target: RemoteTarget::Channel(4), codes: &[4544259, 0] },
        ButtonDef { target: RemoteTarget::Channel(5), codes: &[4544268, 0] },
        ButtonDef { target: RemoteTarget::Channel(8), codes: &[4545795, 0] },
        ButtonDef { target: RemoteTarget::Channel(9), codes: &[4545804, 0] },
        ButtonDef { target: RemoteTarget::Channel(10), codes: &[4551939, 0] },
        ButtonDef { target: RemoteTarget::AllOff, codes: &[4551948, 0] },
    ],
    num_remotes: 2,
    rf_holdoff_ms: 500,
    debug: true,
    interlock_pin: None,
};

/// Interlocked lab box (serials llnl001, gfl002): two paired remotes and a
/// hardware interlock input on pin 3.
pub static LLNL001: DeviceConfig = DeviceConfig {
    model: "DigOutBox",
    hw_version: "v0.1.0",
    channels: MEGA_CHANNELS,
    buttons: &[
        ButtonDef { target: RemoteTarget::Channel(0), codes: &[4543795, 349491] },
        ButtonDef { target: RemoteTarget::Channel(1), codes: &[4543804, 349500] },
        ButtonDef { target: RemoteTarget::Channel(2), codes: &[4543939, 349635] },
        ButtonDef { target: RemoteTarget::Channel(3), codes: &[4543948, 349644] },
        ButtonDef { target: RemoteTarget::Channel(4), codes: &[4544259, 349955] },
        ButtonDef { target: RemoteTarget::Channel(5), codes: &[4544268, 349964] },
        ButtonDef { target: RemoteTarget::Channel(8), codes: &[4545795, 351491] },
        ButtonDef { target: RemoteTarget::Channel(9), codes: &[4545804, 351500] },
        ButtonDef { target: RemoteTarget::Channel(10), codes: &[4551939, 357635] },
        ButtonDef { target: RemoteTarget::AllOff, codes: &[4551948, 357644] },
    ],
    num_remotes: 2,
    rf_holdoff_ms: 500,
    debug: false,
    interlock_pin: Some(3),
};
