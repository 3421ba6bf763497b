//! Peripheral drivers and hardware initialisation.

pub mod as3935;
#[cfg(target_os = "espidf")]
pub mod hw_init;
