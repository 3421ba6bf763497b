//! Station configuration parameters
//!
//! All tunable parameters for the lightning station.  Detector settings and
//! timing are firmware constants; network credentials are baked in at build
//! time from `AS3935_*` environment variables so they never live in the
//! source tree.

use heapless::Vec;

use crate::error::ConfigError;

// ───────────────────────────────────────────────────────────────
// Detector
// ───────────────────────────────────────────────────────────────

/// Analog front-end gain preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfeMode {
    /// Higher gain rejection; the chip's power-on default.
    Indoor,
    /// Full sensitivity for an outdoor mount.
    Outdoor,
}

impl AfeMode {
    /// Five-bit AFE_GB value as given in the datasheet.
    pub const fn gain_bits(self) -> u8 {
        match self {
            Self::Indoor => 0x12,
            Self::Outdoor => 0x0E,
        }
    }

    pub const fn from_gain_bits(bits: u8) -> Option<Self> {
        match bits {
            0x12 => Some(Self::Indoor),
            0x0E => Some(Self::Outdoor),
            _ => None,
        }
    }
}

/// AS3935 settings applied once at startup.
///
/// Values are passed to the driver as-is.  [`DetectorConfig::out_of_range`]
/// reports anything outside the documented ranges so it can be logged, but
/// nothing is clamped or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    pub afe_mode: AfeMode,
    /// `true` stops disturber events from raising the IRQ line.
    pub mask_disturbers: bool,
    /// Noise floor level, 1–7.  Higher rejects more noise.
    pub noise_floor: u8,
    /// Watchdog threshold, 1–10.  Higher rejects more disturbers at the
    /// cost of detection range.
    pub watchdog_threshold: u8,
    /// Spike rejection, 1–11.  Higher filters more non-strike spikes.
    pub spike_rejection: u8,
    /// Strikes required before the IRQ fires: 1, 5, 9 or 16.
    pub strike_threshold: u8,
}

pub const NOISE_FLOOR_RANGE: core::ops::RangeInclusive<u8> = 1..=7;
pub const WATCHDOG_RANGE: core::ops::RangeInclusive<u8> = 1..=10;
pub const SPIKE_REJECTION_RANGE: core::ops::RangeInclusive<u8> = 1..=11;
pub const STRIKE_THRESHOLDS: [u8; 4] = [1, 5, 9, 16];

impl DetectorConfig {
    /// Fields outside their documented range, in application order.
    pub fn out_of_range(&self) -> Vec<ConfigError, 4> {
        let mut bad = Vec::new();
        // Capacity equals the number of checks, so push cannot fail.
        if !NOISE_FLOOR_RANGE.contains(&self.noise_floor) {
            let _ = bad.push(ConfigError::OutOfRange("noise_floor"));
        }
        if !WATCHDOG_RANGE.contains(&self.watchdog_threshold) {
            let _ = bad.push(ConfigError::OutOfRange("watchdog_threshold"));
        }
        if !SPIKE_REJECTION_RANGE.contains(&self.spike_rejection) {
            let _ = bad.push(ConfigError::OutOfRange("spike_rejection"));
        }
        if !STRIKE_THRESHOLDS.contains(&self.strike_threshold) {
            let _ = bad.push(ConfigError::OutOfRange("strike_threshold"));
        }
        bad
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            afe_mode: AfeMode::Outdoor,
            mask_disturbers: false,
            noise_floor: 2,
            watchdog_threshold: 7,
            spike_rejection: 2,
            strike_threshold: 1,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Network
// ───────────────────────────────────────────────────────────────

const fn or_default(value: Option<&'static str>, fallback: &'static str) -> &'static str {
    match value {
        Some(v) => v,
        None => fallback,
    }
}

const fn parse_port(value: Option<&'static str>) -> u16 {
    match value {
        Some(s) => match u16::from_str_radix(s, 10) {
            Ok(port) => port,
            Err(_) => DEFAULT_MQTT_PORT,
        },
        None => DEFAULT_MQTT_PORT,
    }
}

/// Plaintext MQTT.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Prefix for the MQTT client id; the MAC address is appended.
pub const CLIENT_ID_PREFIX: &str = "esp32-client-";

/// WiFi and broker parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    pub mqtt_host: &'static str,
    pub mqtt_port: u16,
    pub mqtt_username: &'static str,
    pub mqtt_password: &'static str,
}

impl NetworkConfig {
    /// Credentials captured from the build environment.
    pub const fn from_build_env() -> Self {
        Self {
            wifi_ssid: or_default(option_env!("AS3935_WIFI_SSID"), ""),
            wifi_password: or_default(option_env!("AS3935_WIFI_PASS"), ""),
            mqtt_host: or_default(option_env!("AS3935_MQTT_HOST"), ""),
            mqtt_port: parse_port(option_env!("AS3935_MQTT_PORT")),
            mqtt_username: or_default(option_env!("AS3935_MQTT_USER"), ""),
            mqtt_password: or_default(option_env!("AS3935_MQTT_PASS"), ""),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

// ───────────────────────────────────────────────────────────────
// Timing
// ───────────────────────────────────────────────────────────────

/// Every suspension point in the firmware.  All are unconditional sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Pause before WiFi bring-up.
    pub startup_delay_ms: u32,
    /// Interval between WiFi association checks.
    pub wifi_retry_ms: u32,
    /// Pause after a failed broker connect.
    pub broker_retry_ms: u32,
    /// Fixed pause at the end of every poll iteration.
    pub poll_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: 10,
            wifi_retry_ms: 500,
            broker_retry_ms: 2_000,
            poll_interval_ms: 100,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Aggregate
// ───────────────────────────────────────────────────────────────

/// Core station configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationConfig {
    pub detector: DetectorConfig,
    pub network: NetworkConfig,
    pub timing: TimingConfig,
}
