//! Retained, fire-and-forget MQTT publishing.
//!
//! Payloads are plain ASCII decimal.  A failed send is traced and dropped:
//! there is no retry, no buffering, and the caller never sees the outcome.

use core::fmt::Write;

use log::debug;

use super::ports::BrokerPort;

pub const TOPIC_STATUS: &str = "esp32/as3935/status";
pub const TOPIC_DISTANCE: &str = "esp32/as3935/lightningdistance";
pub const TOPIC_ENERGY: &str = "esp32/as3935/lightningenergy";

/// Holds any `u32` in decimal (at most 10 digits).
pub type Payload = heapless::String<10>;

/// Render `value` as decimal text without leading zeros.
pub fn decimal(value: u32) -> Payload {
    let mut out = Payload::new();
    // u32::MAX is 10 digits, so this always fits.
    let _ = write!(out, "{value}");
    out
}

/// Publish `value` to `topic` as a retained decimal payload.
pub fn publish_value(broker: &mut impl BrokerPort, topic: &str, value: u32) {
    let payload = decimal(value);
    if let Err(e) = broker.publish(topic, payload.as_bytes(), true) {
        debug!("publish {} <- {} dropped: {}", topic, payload, e);
    }
}

/// Announce a (re)connect with the current status counter.
pub fn publish_status(broker: &mut impl BrokerPort, counter: u8) {
    publish_value(broker, TOPIC_STATUS, u32::from(counter));
}

/// Publish a confirmed strike: distance first, then energy.
pub fn publish_strike(broker: &mut impl BrokerPort, distance_km: u8, energy: u32) {
    publish_value(broker, TOPIC_DISTANCE, u32::from(distance_km));
    publish_value(broker, TOPIC_ENERGY, energy);
}
