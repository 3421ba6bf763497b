//! Stormwatch firmware entry point
//!
//! Probes and configures the AS3935, joins WiFi, then polls the IRQ line
//! forever and forwards lightning strikes to MQTT.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  As3935 driver    WifiAdapter    MqttAdapter    LogEventSink   │
//! │  (DetectorPort)   (NetworkPort)  (BrokerPort)   (EventSink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │                Station (pure logic)                    │    │
//! │  │  configure · bootstrap · poll · publish                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use embedded_hal::delay::DelayNs;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::EspWifi;
    use log::{error, info};

    use stormwatch::adapters::log_sink::{LogEventSink, LogInbound};
    use stormwatch::adapters::mqtt::MqttAdapter;
    use stormwatch::adapters::time::SystemDelay;
    use stormwatch::adapters::wifi::WifiAdapter;
    use stormwatch::app::station::{Io, Station};
    use stormwatch::config::StationConfig;
    use stormwatch::drivers::hw_init::{self, DetectorPins};

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let mut station = Station::new(StationConfig::default());
    let network = station.config().network;
    let mut sink = LogEventSink::new();
    let mut delay = SystemDelay::new();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Detector ───────────────────────────────────────────
    let (mut detector, mut irq) = hw_init::init_detector(
        peripherals.spi3,
        DetectorPins {
            sclk: peripherals.pins.gpio18,
            miso: peripherals.pins.gpio19,
            mosi: peripherals.pins.gpio23,
            cs: peripherals.pins.gpio25,
            irq: peripherals.pins.gpio32,
        },
    )?;

    if let Err(e) = station.bring_up_detector(&mut detector, &mut sink) {
        // No detector, nothing to report.  Park the task.
        error!("Detector bring-up failed: {}, halting", e);
        loop {
            delay.delay_ms(1_000);
        }
    }

    // ── 3. Network ────────────────────────────────────────────
    let wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
    let mut net = WifiAdapter::from_config(wifi, &network)?;
    station.bring_up_network(&mut net, &mut delay, &mut sink)?;

    let mut broker = MqttAdapter::new(network, LogInbound);

    // ── 4. Poll loop ──────────────────────────────────────────
    info!("System ready. Entering poll loop.");
    station.run(Io {
        detector: &mut detector,
        irq: &mut irq,
        net: &mut net,
        broker: &mut broker,
        delay: &mut delay,
        sink: &mut sink,
    })
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "stormwatch v{} targets ESP-IDF; build with an espidf target to flash, \
         or run `cargo test` on the host",
        env!("CARGO_PKG_VERSION")
    );
}
