//! Blocking delay adapter.
//!
//! Provides the [`DelayNs`] implementation the application pauses with.
//!
//! - **`target_os = "espidf"`**: delegates to `FreeRtos`, which yields to
//!   the scheduler (the MQTT and WiFi tasks keep running).
//! - **`not(target_os = "espidf")`**: `std::thread::sleep` for host-side
//!   simulation.

use embedded_hal::delay::DelayNs;

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::FreeRtos;

/// Delay source for the main task.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl SystemDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for SystemDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        FreeRtos.delay_ns(ns);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
