//! Network bring-up and broker reconnection.
//!
//! Both waits are deliberate: WiFi association is retried forever at a
//! fixed interval, and a failed broker handshake costs one fixed pause
//! before control returns to the poll loop, which tries again next pass.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::config::{CLIENT_ID_PREFIX, NetworkConfig, TimingConfig};

use super::events::{AppEvent, ClientId};
use super::ports::{BrokerError, BrokerPort, ConnectivityError, EventSink, NetworkPort};
use super::publisher;

// ───────────────────────────────────────────────────────────────
// Status counter
// ───────────────────────────────────────────────────────────────

/// Published on every successful (re)connect.
///
/// Yields 0 on the first connect, then 1..=9 and wraps back to 1; zero is
/// never seen again after the first wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounter(u8);

impl StatusCounter {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Value the next connect will publish.
    pub const fn peek(self) -> u8 {
        self.0
    }

    /// Return the current value and advance.
    pub fn advance(&mut self) -> u8 {
        let current = self.0;
        self.0 += 1;
        if self.0 == 10 {
            self.0 = 1;
        }
        current
    }
}

// ───────────────────────────────────────────────────────────────
// Client identity
// ───────────────────────────────────────────────────────────────

/// `esp32-client-` followed by the MAC as `AA:BB:CC:DD:EE:FF`.
pub fn client_id(mac: &[u8; 6]) -> ClientId {
    let mut id = ClientId::new();
    // 13 + 17 bytes, within capacity.
    let _ = write!(
        id,
        "{}{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        CLIENT_ID_PREFIX, mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    id
}

// ───────────────────────────────────────────────────────────────
// WiFi
// ───────────────────────────────────────────────────────────────

/// Start association and block until the station holds an address.
///
/// There is no attempt cap and no timeout.  Only a rejected `begin` (for
/// example missing credentials) returns early.
pub fn join_network(
    net: &mut impl NetworkPort,
    delay: &mut impl DelayNs,
    network: &NetworkConfig,
    timing: &TimingConfig,
    sink: &mut impl EventSink,
) -> Result<(), ConnectivityError> {
    sink.emit(&AppEvent::WifiConnecting {
        ssid: network.wifi_ssid,
    });
    net.begin()?;

    while !net.is_associated() {
        delay.delay_ms(timing.wifi_retry_ms);
        sink.emit(&AppEvent::WifiWaiting);
    }

    sink.emit(&AppEvent::WifiConnected { ip: net.local_ip() });
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Broker
// ───────────────────────────────────────────────────────────────

/// What [`ensure_connected`] did this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Session was up; nothing ran.
    AlreadyConnected,
    /// Handshake succeeded and the status counter was published.
    Reconnected { status: u8 },
    /// Handshake failed; the retry pause has already elapsed.
    Failed(BrokerError),
    /// WiFi could not be restarted.
    NetworkDown(ConnectivityError),
}

/// Reconnect to the broker if the session is down.
///
/// Runs once per poll iteration.  When the broker reports connected this is
/// a single check and nothing else.
#[allow(clippy::too_many_arguments)]
pub fn ensure_connected(
    net: &mut impl NetworkPort,
    broker: &mut impl BrokerPort,
    delay: &mut impl DelayNs,
    network: &NetworkConfig,
    timing: &TimingConfig,
    counter: &mut StatusCounter,
    sink: &mut impl EventSink,
) -> LinkStatus {
    if broker.is_connected() {
        return LinkStatus::AlreadyConnected;
    }

    if !net.is_associated() {
        if let Err(e) = join_network(net, delay, network, timing, sink) {
            delay.delay_ms(timing.broker_retry_ms);
            return LinkStatus::NetworkDown(e);
        }
    }

    let id = client_id(&net.mac_address());
    match broker.connect(&id) {
        Ok(()) => {
            sink.emit(&AppEvent::BrokerConnected { client_id: id });
            let status = counter.advance();
            publisher::publish_status(broker, status);
            sink.emit(&AppEvent::StatusPublished(status));
            LinkStatus::Reconnected { status }
        }
        Err(e) => {
            sink.emit(&AppEvent::BrokerConnectFailed(e));
            delay.delay_ms(timing.broker_retry_ms);
            LinkStatus::Failed(e)
        }
    }
}
