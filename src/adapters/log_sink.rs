//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART in production).  Also provides the inbound-message handler
//! the firmware installs on the MQTT client, which only logs.

use log::{debug, error, info, warn};

use crate::app::events::{AppEvent, Readback};
use crate::app::ports::{EventSink, InboundHandler};
use crate::config::AfeMode;
use crate::drivers::as3935::{DISTANCE_OUT_OF_RANGE, DISTANCE_OVERHEAD};

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "YES" } else { "NO" }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("AS3935 Franklin Lightning Detector v{}", env!("CARGO_PKG_VERSION"));
            }
            AppEvent::DetectorMissing(e) => {
                error!("Lightning Detector did not start up ({}), freezing!", e);
            }
            AppEvent::DetectorReady => info!("Lightning Detector Ready!"),
            AppEvent::ConfigOutOfRange(e) => warn!("CONFIG | {} (written anyway)", e),
            AppEvent::SettingFailed { setting, error } => {
                warn!("CONFIG | {} failed: {}", setting, error);
            }
            AppEvent::Readback(rb) => match rb {
                Readback::AfeMode(Some(AfeMode::Indoor)) => info!("AFE mode: indoor"),
                Readback::AfeMode(Some(AfeMode::Outdoor)) => info!("AFE mode: outdoor"),
                Readback::AfeMode(None) => info!("AFE mode: non-standard gain"),
                Readback::DisturbersMasked(m) => {
                    info!("Are disturbers being masked: {}", yes_no(*m));
                }
                Readback::NoiseFloor(v) => info!("Noise Level is set at: {}", v),
                Readback::WatchdogThreshold(v) => info!("Watchdog Threshold is set to: {}", v),
                Readback::SpikeRejection(v) => info!("Spike Rejection is set to: {}", v),
                Readback::StrikeThreshold(v) => {
                    info!("The number of strikes before interrupt is triggered: {}", v);
                }
            },
            AppEvent::WifiConnecting { ssid } => info!("Connecting to {}", ssid),
            AppEvent::WifiWaiting => debug!("."),
            AppEvent::WifiConnected { ip } => match ip {
                Some([a, b, c, d]) => info!("WiFi connected, IP address: {}.{}.{}.{}", a, b, c, d),
                None => info!("WiFi connected"),
            },
            AppEvent::BrokerConnected { client_id } => {
                info!("MQTT | connected as {}", client_id);
            }
            AppEvent::BrokerConnectFailed(e) => {
                warn!("MQTT | failed with state {} ({})", e.code(), e);
            }
            AppEvent::StatusPublished(n) => debug!("MQTT | status {}", n),
            AppEvent::Noise => info!("Noise."),
            AppEvent::Disturber => info!("Disturber."),
            AppEvent::Strike {
                distance_km,
                energy,
            } => {
                info!("Lightning Strike Detected!");
                match *distance_km {
                    DISTANCE_OUT_OF_RANGE => info!("Storm out of range"),
                    DISTANCE_OVERHEAD => info!("Storm overhead!"),
                    d => info!("Approximately: {}km away!", d),
                }
                info!("Lightning Energy: {}", energy);
            }
            AppEvent::UnrecognizedInterrupt(v) => debug!("IRQ | ignored cause 0x{:02X}", v),
            AppEvent::PinReadFailed => warn!("IRQ | pin read failed"),
            AppEvent::ReadFailed(e) => warn!("IRQ | {}", e),
            AppEvent::Heartbeat {
                passes,
                last_interrupt,
            } => match last_interrupt {
                Some(v) => debug!("LOOP | pass {}, last interrupt 0x{:02X}", passes, v),
                None => debug!("LOOP | pass {}, no interrupt yet", passes),
            },
        }
    }
}

/// Logs any message the broker pushes to us.  Takes no other action.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInbound;

impl InboundHandler for LogInbound {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        info!(
            "Message arrived on topic: {}. Message: {}",
            topic,
            String::from_utf8_lossy(payload)
        );
    }
}
