//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to              |
//! |------------|-----------------|--------------------------|
//! | `log_sink` | EventSink       | Serial log output        |
//! |            | InboundHandler  |                          |
//! | `mqtt`     | BrokerPort      | ESP-IDF MQTT client      |
//! | `time`     | DelayNs         | FreeRTOS delay           |
//! | `wifi`     | NetworkPort     | ESP-IDF WiFi STA         |
//!
//! The detector itself (`DetectorPort`) is implemented directly by the
//! AS3935 driver in `drivers`.

pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
