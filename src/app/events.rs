//! Outbound application events.
//!
//! The station emits these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them; in the
//! firmware they become serial console lines.

use crate::app::ports::BrokerError;
use crate::config::AfeMode;
use crate::error::{ConfigError, SensorError};

/// Fixed-capacity MQTT client id (`esp32-client-` + 17-char MAC).
pub type ClientId = heapless::String<32>;

/// A detector setting as read back after configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readback {
    /// `None` when the gain bits match neither preset.
    AfeMode(Option<AfeMode>),
    DisturbersMasked(bool),
    NoiseFloor(u8),
    WatchdogThreshold(u8),
    SpikeRejection(u8),
    StrikeThreshold(u8),
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Firmware banner.
    Started,

    // ── Detector bring-up ─────────────────────────────────────
    /// The probe failed; the firmware is about to halt.
    DetectorMissing(SensorError),
    /// The probe succeeded.
    DetectorReady,
    /// A configured value lies outside its documented range.  It is still
    /// written to the chip.
    ConfigOutOfRange(ConfigError),
    /// A setting write or read-back failed.
    SettingFailed {
        setting: &'static str,
        error: SensorError,
    },
    /// A setting was read back after being written.
    Readback(Readback),

    // ── Network ───────────────────────────────────────────────
    WifiConnecting { ssid: &'static str },
    /// One association check came back negative.
    WifiWaiting,
    WifiConnected { ip: Option<[u8; 4]> },
    BrokerConnected { client_id: ClientId },
    BrokerConnectFailed(BrokerError),
    StatusPublished(u8),

    // ── Detector events ───────────────────────────────────────
    Noise,
    Disturber,
    Strike { distance_km: u8, energy: u32 },
    /// IRQ fired with a cause that matches no known mask.
    UnrecognizedInterrupt(u8),
    /// The IRQ line could not be sampled.
    PinReadFailed,
    /// An interrupt or measurement register could not be read.
    ReadFailed(SensorError),

    /// Periodic liveness report from the poll loop.
    Heartbeat { passes: u64, last_interrupt: Option<u8> },
}
