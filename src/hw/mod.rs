//! Hardware bindings for the Raspberry Pi Pico W build.
//!
//! Everything under here implements the collaborator traits the session
//! core consumes: GPIO input tasks, the SSD1306 screen, the WS2812 ring
//! and the CYW43 network service. Only compiled with the `embedded`
//! feature.

pub mod buttons;
pub mod net;
pub mod oled;
pub mod ring;

use crate::fsm::SystemControl;

/// Timestamp for the session core, milliseconds since boot.
pub fn now_ms() -> u64 {
    embassy_time::Instant::now().as_millis()
}

/// [`SystemControl`] backed by the Cortex-M system reset.
pub struct McuReset;

impl SystemControl for McuReset {
    fn reboot(&mut self) {
        defmt::warn!("Rebooting");
        cortex_m::peripheral::SCB::sys_reset();
    }
}
