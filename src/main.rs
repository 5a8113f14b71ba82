//! DigOutBox - Main entry point
//!
//! Startup: validate the board table, claim pins, then poll. One event per
//! loop iteration, RF first, serial otherwise. A table or pin failure
//! latches a fault and parks without ever initializing the output stage.

#![cfg_attr(target_os = "espidf", no_std, no_main)]

#[cfg(target_os = "espidf")]
use core::fmt::Write;

#[cfg(target_os = "espidf")]
use digoutbox::{
    config::boards,
    diag_debug, diag_warn,
    dispatch::Dispatcher,
    fault::{FaultCode, FaultState},
    hal,
    logging::DiagStream,
    rf::{RfEvent, RfEventQueue},
    scpi::{self, LineBuffer},
};

// Static allocations, shared between the ISR hook and the main loop
#[cfg(target_os = "espidf")]
static RF_EVENTS: RfEventQueue = RfEventQueue::new();
#[cfg(target_os = "espidf")]
static DIAG: DiagStream = DiagStream::new();
#[cfg(target_os = "espidf")]
static FAULT: FaultState = FaultState::new();

/// Entry point for the RF decoder component: called from its ISR with each
/// decoded code. Timestamp and enqueue only; matching and dispatch run on
/// the main loop.
#[cfg(target_os = "espidf")]
#[no_mangle]
pub extern "C" fn digoutbox_rf_code_received(code: u32) {
    let _ = RF_EVENTS.push(RfEvent {
        code,
        timestamp_ms: hal::now_ms(),
    });
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    esp_idf_svc::sys::link_patches();

    let mut serial = hal::SerialOut;
    if let Err(error) = hal::serial_init() {
        FAULT.set(FaultCode::HardwareFault, error.code() as u32);
        park();
    }

    let config = boards::ACTIVE;
    if let Err(error) = config.validate() {
        FAULT.set(FaultCode::ConfigInvalid, 0);
        let _ = writeln!(serial, "config rejected: {}", error);
        park();
    }

    let mut bus = match hal::EspOutputBank::claim(config) {
        Ok(bus) => bus,
        Err(error) => {
            FAULT.set(FaultCode::HardwareFault, error.code() as u32);
            let _ = writeln!(serial, "gpio claim failed: {}", error);
            park();
        }
    };

    let interlock = match config.interlock_pin.map(hal::InterlockInput::claim).transpose() {
        Ok(input) => input,
        Err(error) => {
            FAULT.set(FaultCode::HardwareFault, error.code() as u32);
            let _ = writeln!(serial, "interlock claim failed: {}", error);
            park();
        }
    };

    let mut dispatcher = Dispatcher::new(config);
    dispatcher.init(&mut bus);

    let _ = writeln!(serial, "{} {} ready", config.model, scpi::VERSION);

    let mut line = LineBuffer::new();

    loop {
        if let Some(input) = &interlock {
            dispatcher.update_interlock(input.is_tripped(), &mut bus);
        }

        if let Some(event) = RF_EVENTS.pop() {
            let outcome = dispatcher.handle_rf(event, &mut bus);
            diag_debug!(DIAG, event.timestamp_ms, "rf {:07}: {:?}", event.code, outcome);
        } else if let Some(byte) = hal::serial_read_byte() {
            if line.feed(byte) {
                let result = line
                    .line()
                    .and_then(|text| scpi::process_line(text, &mut dispatcher, &mut bus, &mut serial));
                if let Err(error) = result {
                    scpi::reply_error(error, &mut serial);
                    diag_warn!(DIAG, hal::now_ms(), "host command rejected: {}", error);
                }
                line.clear();
            }
        } else {
            hal::idle_tick();
        }

        // Replies are written whole above, so diagnostics only ever land
        // between complete protocol lines.
        if config.debug {
            while let Some(entry) = DIAG.drain() {
                let _ = writeln!(
                    serial,
                    "# {} [{}] {}",
                    entry.timestamp_ms,
                    entry.level.as_str(),
                    entry.text()
                );
            }
        }
    }
}

/// Fault latched: hold here without ever driving an output.
#[cfg(target_os = "espidf")]
fn park() -> ! {
    loop {
        hal::idle_tick();
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("digoutbox is device firmware; build it for an ESP-IDF target");
}
