//! WiFi station-mode adapter.
//!
//! Implements [`NetworkPort`], the hexagonal boundary for the station link.
//! `begin` only issues the association request; the application polls
//! [`NetworkPort::is_associated`] until the interface holds an address.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConnectivityError, NetworkPort};
use crate::config::NetworkConfig;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

/// SSIDs are up to 32 octets of arbitrary content; only the length is checked.
fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

/// Polls before the simulated station reports an address.
#[cfg(not(target_os = "espidf"))]
const SIM_ASSOCIATION_POLLS: u32 = 3;

/// Simulated station MAC (locally administered).
#[cfg(not(target_os = "espidf"))]
const SIM_MAC: [u8; 6] = [0x02, 0xDE, 0xAD, 0xBE, 0xEF, 0x01];

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    started: bool,
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,
    /// Simulation: `is_associated` polls since the last `begin`.
    #[cfg(not(target_os = "espidf"))]
    sim_polls: Option<u32>,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: EspWifi<'static>) -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            started: false,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            started: false,
            sim_polls: None,
        }
    }

    /// Adapter pre-loaded with the build-time credentials.
    #[cfg(not(target_os = "espidf"))]
    pub fn from_config(network: &NetworkConfig) -> Result<Self, ConnectivityError> {
        let mut a = Self::new();
        a.set_credentials(network.wifi_ssid, network.wifi_password)?;
        Ok(a)
    }

    /// Adapter pre-loaded with the build-time credentials.
    #[cfg(target_os = "espidf")]
    pub fn from_config(
        wifi: EspWifi<'static>,
        network: &NetworkConfig,
    ) -> Result<Self, ConnectivityError> {
        let mut a = Self::new(wifi);
        a.set_credentials(network.wifi_ssid, network.wifi_password)?;
        Ok(a)
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_begin(&mut self) -> Result<(), ConnectivityError> {
        if !self.started {
            let auth_method = if self.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            let conf = Configuration::Client(ClientConfiguration {
                ssid: self.ssid.clone(),
                password: self.password.clone(),
                auth_method,
                ..Default::default()
            });
            self.wifi.set_configuration(&conf).map_err(|e| {
                warn!("WiFi: set_configuration failed: {}", e);
                ConnectivityError::ConnectionFailed
            })?;
            self.wifi.start().map_err(|e| {
                warn!("WiFi: start failed: {}", e);
                ConnectivityError::ConnectionFailed
            })?;
        }
        self.wifi.connect().map_err(|e| {
            warn!("WiFi: connect request failed: {}", e);
            ConnectivityError::ConnectionFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin(&mut self) -> Result<(), ConnectivityError> {
        self.sim_polls = Some(0);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_associated(&mut self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_associated(&mut self) -> bool {
        match self.sim_polls.as_mut() {
            Some(n) if *n >= SIM_ASSOCIATION_POLLS => true,
            Some(n) => {
                *n += 1;
                false
            }
            None => false,
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_ip(&mut self) -> Option<[u8; 4]> {
        self.wifi
            .sta_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip.octets())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_ip(&mut self) -> Option<[u8; 4]> {
        Some([192, 168, 4, 2])
    }

    #[cfg(target_os = "espidf")]
    fn platform_mac(&mut self) -> [u8; 6] {
        self.wifi.sta_netif().get_mac().unwrap_or_else(|e| {
            warn!("WiFi: MAC read failed: {}", e);
            [0; 6]
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_mac(&mut self) -> [u8; 6] {
        SIM_MAC
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkPort
// ───────────────────────────────────────────────────────────────

impl NetworkPort for WifiAdapter {
    fn begin(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        info!("WiFi: associating with '{}'", self.ssid);
        self.platform_begin()?;
        self.started = true;
        Ok(())
    }

    fn is_associated(&mut self) -> bool {
        self.started && self.platform_is_associated()
    }

    fn local_ip(&mut self) -> Option<[u8; 4]> {
        if !self.is_associated() {
            return None;
        }
        self.platform_ip()
    }

    fn mac_address(&mut self) -> [u8; 6] {
        self.platform_mac()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
