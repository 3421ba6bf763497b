//! MQTT client adapter.
//!
//! Implements [`BrokerPort`] on top of the ESP-IDF MQTT client.  The client
//! runs its own task; connection state is mirrored into an `AtomicBool`
//! from the event callback, and received messages are forwarded to an
//! [`InboundHandler`].
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: simulation stub that logs publishes.

use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{BrokerError, BrokerPort, InboundHandler};
use crate::config::NetworkConfig;

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

/// Longest `mqtt://host:port` the adapter builds.
pub type BrokerUrl = heapless::String<96>;

/// Time allowed for the CONNACK after the client starts.
pub const CONNECT_TIMEOUT_MS: u32 = 5_000;
#[cfg(target_os = "espidf")]
const CONNECT_POLL_MS: u32 = 50;

/// `mqtt://host:port` for the configured broker.
pub fn broker_url(network: &NetworkConfig) -> Result<BrokerUrl, BrokerError> {
    let mut url = BrokerUrl::new();
    write!(url, "mqtt://{}:{}", network.mqtt_host, network.mqtt_port)
        .map_err(|_| BrokerError::Transport(-1))?;
    Ok(url)
}

#[cfg(target_os = "espidf")]
fn non_empty(s: &'static str) -> Option<&'static str> {
    if s.is_empty() { None } else { Some(s) }
}

pub struct MqttAdapter<H> {
    network: NetworkConfig,
    handler: H,
    connected: Arc<AtomicBool>,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    /// Simulation: publishes issued, for logging only.
    #[cfg(not(target_os = "espidf"))]
    sim_published: u32,
}

impl<H> MqttAdapter<H>
where
    H: InboundHandler + Clone + Send + 'static,
{
    pub fn new(network: NetworkConfig, handler: H) -> Self {
        Self {
            network,
            handler,
            connected: Arc::new(AtomicBool::new(false)),
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_published: 0,
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        use esp_idf_svc::hal::delay::FreeRtos;

        // A stale client keeps retrying on its own; drop it first.
        self.client = None;
        self.connected.store(false, Ordering::SeqCst);

        let url = broker_url(&self.network)?;
        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            username: non_empty(self.network.mqtt_username),
            password: non_empty(self.network.mqtt_password),
            ..Default::default()
        };

        let connected = self.connected.clone();
        let mut handler = self.handler.clone();
        let client = EspMqttClient::new_cb(&url, &conf, move |event| match event.payload() {
            EventPayload::Connected(_) => connected.store(true, Ordering::SeqCst),
            EventPayload::Disconnected => connected.store(false, Ordering::SeqCst),
            EventPayload::Received {
                topic: Some(topic),
                data,
                ..
            } => handler.on_message(topic, data),
            EventPayload::Error(e) => warn!("MQTT | client error: {}", e),
            _ => {}
        })
        .map_err(|e| BrokerError::Transport(e.code()))?;
        self.client = Some(client);

        let mut waited = 0;
        while !self.connected.load(Ordering::SeqCst) {
            if waited >= CONNECT_TIMEOUT_MS {
                self.client = None;
                return Err(BrokerError::Timeout);
            }
            FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited += CONNECT_POLL_MS;
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        let url = broker_url(&self.network)?;
        info!("MQTT(sim): {} connected to {}", client_id, url);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), BrokerError> {
        let client = self.client.as_mut().ok_or(BrokerError::NotConnected)?;
        client
            .publish(topic, QoS::AtMostOnce, retain, payload)
            .map(|_| ())
            .map_err(|e| BrokerError::Transport(e.code()))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), BrokerError> {
        self.sim_published = self.sim_published.wrapping_add(1);
        info!(
            "MQTT(sim): #{} {} <- {} (retain={})",
            self.sim_published,
            topic,
            String::from_utf8_lossy(payload),
            retain
        );
        Ok(())
    }

    /// Simulation: deliver a message as if the broker had pushed it.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_deliver(&mut self, topic: &str, payload: &[u8]) {
        self.handler.on_message(topic, payload);
    }

    /// Simulation: drop the session so the next pass reconnects.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_session(&mut self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

// ───────────────────────────────────────────────────────────────
// BrokerPort
// ───────────────────────────────────────────────────────────────

impl<H> BrokerPort for MqttAdapter<H>
where
    H: InboundHandler + Clone + Send + 'static,
{
    fn is_connected(&mut self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        debug!("MQTT | connecting to {}:{}", self.network.mqtt_host, self.network.mqtt_port);
        self.platform_connect(client_id)
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), BrokerError> {
        if !self.is_connected() {
            return Err(BrokerError::NotConnected);
        }
        self.platform_publish(topic, payload, retain)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
