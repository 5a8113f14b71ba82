//! Hardware Abstraction Layer for DigOutBox.
//!
//! Thin wrappers around ESP-IDF peripherals. Business logic stays in the
//! core modules, the HAL is just I/O.

pub mod gpio;

pub use gpio::{EspOutputBank, InterlockInput};

use esp_idf_svc::sys;

/// Console UART, same port the bootloader logs on.
const UART_PORT: sys::uart_port_t = 0;

/// Install the console UART driver.
pub fn serial_init() -> Result<(), sys::EspError> {
    sys::esp!(unsafe {
        sys::uart_driver_install(UART_PORT, 256, 256, 0, core::ptr::null_mut(), 0)
    })
}

/// Non-blocking read of one serial byte.
pub fn serial_read_byte() -> Option<u8> {
    let mut byte = 0u8;
    let n = unsafe {
        sys::uart_read_bytes(
            UART_PORT,
            &mut byte as *mut u8 as *mut core::ffi::c_void,
            1,
            0,
        )
    };
    (n == 1).then_some(byte)
}

/// Serial transmit end, usable everywhere a `core::fmt::Write` is expected.
pub struct SerialOut;

impl core::fmt::Write for SerialOut {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        unsafe {
            sys::uart_write_bytes(
                UART_PORT,
                s.as_ptr() as *const core::ffi::c_void,
                s.len(),
            );
        }
        Ok(())
    }
}

/// Milliseconds since boot, wrapping.
pub fn now_ms() -> u32 {
    (unsafe { sys::esp_timer_get_time() } / 1000) as u32
}

/// Yield one FreeRTOS tick.
pub fn idle_tick() {
    unsafe { sys::vTaskDelay(1) };
}
