//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the behaviour of the lightning station: detector
//! bring-up, network bootstrap, IRQ polling and MQTT publishing.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`] (plus `embedded-hal`'s `InputPin` and `DelayNs`), keeping this
//! layer fully testable without real peripherals.

pub mod bootstrap;
pub mod configurator;
pub mod events;
pub mod poller;
pub mod ports;
pub mod publisher;
pub mod station;
