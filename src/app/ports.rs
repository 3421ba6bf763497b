//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Station (domain)
//! ```
//!
//! Driven adapters (the AS3935 driver, WiFi, MQTT, event sinks) implement
//! these traits.  The [`Station`](super::station::Station) consumes them via
//! generics, so the domain core never touches hardware directly.  The IRQ
//! line and every pause go through the `embedded-hal` `InputPin` and
//! `DelayNs` traits instead of a bespoke port.

use core::fmt;

use crate::config::AfeMode;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Detector port (driven adapter: AS3935 ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Setting-level access to the lightning detector.
///
/// Setters pass values through to the chip without range checks; each has a
/// matching getter that reads the register back.
pub trait DetectorPort {
    /// Confirm the chip answers on the bus.  Failure is unrecoverable.
    fn probe(&mut self) -> Result<(), SensorError>;

    fn set_afe_mode(&mut self, mode: AfeMode) -> Result<(), SensorError>;
    /// `None` when the gain bits match neither preset.
    fn afe_mode(&mut self) -> Result<Option<AfeMode>, SensorError>;

    fn set_disturbers_masked(&mut self, masked: bool) -> Result<(), SensorError>;
    fn disturbers_masked(&mut self) -> Result<bool, SensorError>;

    fn set_noise_floor(&mut self, level: u8) -> Result<(), SensorError>;
    fn noise_floor(&mut self) -> Result<u8, SensorError>;

    fn set_watchdog_threshold(&mut self, level: u8) -> Result<(), SensorError>;
    fn watchdog_threshold(&mut self) -> Result<u8, SensorError>;

    fn set_spike_rejection(&mut self, level: u8) -> Result<(), SensorError>;
    fn spike_rejection(&mut self) -> Result<u8, SensorError>;

    fn set_strike_threshold(&mut self, strikes: u8) -> Result<(), SensorError>;
    fn strike_threshold(&mut self) -> Result<u8, SensorError>;

    /// Latched interrupt cause.  Reading clears the latch.
    fn read_interrupt(&mut self) -> Result<u8, SensorError>;

    /// Estimated distance to the storm front in km.  The chip folds in
    /// every event from the trailing 15 s window.
    fn distance_km(&mut self) -> Result<u8, SensorError>;

    /// Raw energy of the last strike (20 bits, no physical unit).
    fn strike_energy(&mut self) -> Result<u32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: WiFi station ↔ domain)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

/// WiFi station link.
pub trait NetworkPort {
    /// Kick off association.  Returns once the request is issued; poll
    /// [`is_associated`](Self::is_associated) for the outcome.
    fn begin(&mut self) -> Result<(), ConnectivityError>;

    /// `true` once the station holds an IP address.
    fn is_associated(&mut self) -> bool;

    /// Station IPv4 address, when associated.
    fn local_ip(&mut self) -> Option<[u8; 4]>;

    /// Station MAC address.
    fn mac_address(&mut self) -> [u8; 6];
}

// ───────────────────────────────────────────────────────────────
// Broker port (driven adapter: MQTT client ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Errors from [`BrokerPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    /// No CONNACK within the handshake window.
    Timeout,
    /// The broker answered CONNACK with a non-zero return code.
    Refused(i32),
    /// The transport or client library reported an error code.
    Transport(i32),
    /// Publish attempted without a session.
    NotConnected,
}

impl BrokerError {
    /// Numeric state for the console, using the classic PubSubClient codes
    /// (-4 timeout, -2 connect failed, -3 lost, 1..5 CONNACK refusals).
    pub fn code(self) -> i32 {
        match self {
            Self::Timeout => -4,
            Self::NotConnected => -3,
            Self::Transport(_) => -2,
            Self::Refused(rc) => rc,
        }
    }
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "connect timed out"),
            Self::Refused(rc) => write!(f, "connection refused (rc={rc})"),
            Self::Transport(rc) => write!(f, "transport error (rc={rc})"),
            Self::NotConnected => write!(f, "not connected"),
        }
    }
}

impl core::error::Error for BrokerError {}

/// Minimal MQTT client surface.
pub trait BrokerPort {
    fn is_connected(&mut self) -> bool;

    /// One handshake attempt with the given client id.  Credentials and
    /// broker address are adapter configuration.
    fn connect(&mut self, client_id: &str) -> Result<(), BrokerError>;

    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), BrokerError>;
}

// ───────────────────────────────────────────────────────────────
// Inbound message hook (driving adapter: broker → domain)
// ───────────────────────────────────────────────────────────────

/// Receives messages the broker pushes to this client.
///
/// The station subscribes to nothing, so in practice this only fires for
/// messages a broker delivers unasked.  The default does nothing.
pub trait InboundHandler {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        let _ = (topic, payload);
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
