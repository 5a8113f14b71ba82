//! GPIO bank for channel outputs, LEDs and the interlock input.

use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_svc::sys::EspError;
use heapless::Vec;

use crate::channels::{Level, OutputBus};
use crate::config::{DeviceConfig, MAX_CHANNELS};

/// One driver per claimed pin: output then LED, table order.
const PIN_CAPACITY: usize = 2 * MAX_CHANNELS;

/// Owns the pin drivers for every channel output and LED.
pub struct EspOutputBank {
    pins: Vec<(u8, PinDriver<'static, AnyOutputPin, Output>), PIN_CAPACITY>,
}

impl EspOutputBank {
    /// Claim every output and LED pin of the board table.
    pub fn claim(config: &DeviceConfig) -> Result<Self, EspError> {
        let mut pins = Vec::new();
        for channel in config.channels {
            for pin in [channel.output_pin, channel.led_pin] {
                // SAFETY: validate() guarantees each pin number appears once
                // in the table, so no driver aliases another pin.
                let driver = PinDriver::output(unsafe { AnyOutputPin::new(pin as i32) })?;
                let _ = pins.push((pin, driver));
            }
        }
        Ok(Self { pins })
    }
}

impl OutputBus for EspOutputBank {
    fn set_level(&mut self, pin: u8, level: Level) {
        if let Some((_, driver)) = self.pins.iter_mut().find(|(p, _)| *p == pin) {
            let _ = match level {
                Level::High => driver.set_high(),
                Level::Low => driver.set_low(),
            };
        }
    }
}

/// Interlock chain input, pulled up. An open chain reads LOW and counts as
/// tripped.
pub struct InterlockInput {
    pin: PinDriver<'static, AnyIOPin, Input>,
}

impl InterlockInput {
    pub fn claim(pin: u8) -> Result<Self, EspError> {
        let mut driver = PinDriver::input(unsafe { AnyIOPin::new(pin as i32) })?;
        driver.set_pull(Pull::Up)?;
        Ok(Self { pin: driver })
    }

    pub fn is_tripped(&self) -> bool {
        self.pin.is_low()
    }
}
