//! Mock hardware and network adapters for integration tests.
//!
//! Every fake records what the application asked of it so tests can assert
//! on the full call history without a chip, a radio, or a broker.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};

use stormwatch::app::events::AppEvent;
use stormwatch::app::ports::{
    BrokerError, BrokerPort, ConnectivityError, DetectorPort, EventSink, NetworkPort,
};
use stormwatch::config::AfeMode;
use stormwatch::error::SensorError;

// ── Detector ──────────────────────────────────────────────────

/// Register-free stand-in for the AS3935.
pub struct FakeDetector {
    pub responding: bool,
    pub afe_mode: Option<AfeMode>,
    pub masked: bool,
    pub noise_floor: u8,
    pub watchdog: u8,
    pub spike: u8,
    pub strikes: u8,
    /// Interrupt values handed out one per `read_interrupt`.
    pub interrupts: VecDeque<u8>,
    pub distance_km: u8,
    pub energy: u32,
    pub fail_measurements: bool,
    /// Setter names in call order.
    pub writes: Vec<&'static str>,
}

#[allow(dead_code)]
impl FakeDetector {
    pub fn new() -> Self {
        Self {
            responding: true,
            afe_mode: None,
            masked: false,
            noise_floor: 0,
            watchdog: 0,
            spike: 0,
            strikes: 0,
            interrupts: VecDeque::new(),
            distance_km: 0,
            energy: 0,
            fail_measurements: false,
            writes: Vec::new(),
        }
    }

    pub fn missing() -> Self {
        Self {
            responding: false,
            ..Self::new()
        }
    }

    pub fn with_strike(distance_km: u8, energy: u32) -> Self {
        Self {
            distance_km,
            energy,
            ..Self::new()
        }
    }

    fn check(&self) -> Result<(), SensorError> {
        if self.responding { Ok(()) } else { Err(SensorError::Bus) }
    }
}

impl Default for FakeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorPort for FakeDetector {
    fn probe(&mut self) -> Result<(), SensorError> {
        if self.responding { Ok(()) } else { Err(SensorError::NotResponding) }
    }

    fn set_afe_mode(&mut self, mode: AfeMode) -> Result<(), SensorError> {
        self.check()?;
        self.writes.push("afe_mode");
        self.afe_mode = Some(mode);
        Ok(())
    }

    fn afe_mode(&mut self) -> Result<Option<AfeMode>, SensorError> {
        self.check()?;
        Ok(self.afe_mode)
    }

    fn set_disturbers_masked(&mut self, masked: bool) -> Result<(), SensorError> {
        self.check()?;
        self.writes.push("disturber_mask");
        self.masked = masked;
        Ok(())
    }

    fn disturbers_masked(&mut self) -> Result<bool, SensorError> {
        self.check()?;
        Ok(self.masked)
    }

    fn set_noise_floor(&mut self, level: u8) -> Result<(), SensorError> {
        self.check()?;
        self.writes.push("noise_floor");
        self.noise_floor = level & 0x07;
        Ok(())
    }

    fn noise_floor(&mut self) -> Result<u8, SensorError> {
        self.check()?;
        Ok(self.noise_floor)
    }

    fn set_watchdog_threshold(&mut self, level: u8) -> Result<(), SensorError> {
        self.check()?;
        self.writes.push("watchdog_threshold");
        self.watchdog = level & 0x0F;
        Ok(())
    }

    fn watchdog_threshold(&mut self) -> Result<u8, SensorError> {
        self.check()?;
        Ok(self.watchdog)
    }

    fn set_spike_rejection(&mut self, level: u8) -> Result<(), SensorError> {
        self.check()?;
        self.writes.push("spike_rejection");
        self.spike = level & 0x0F;
        Ok(())
    }

    fn spike_rejection(&mut self) -> Result<u8, SensorError> {
        self.check()?;
        Ok(self.spike)
    }

    fn set_strike_threshold(&mut self, strikes: u8) -> Result<(), SensorError> {
        self.check()?;
        self.writes.push("strike_threshold");
        if !matches!(strikes, 1 | 5 | 9 | 16) {
            return Err(SensorError::InvalidSetting("strike_threshold"));
        }
        self.strikes = strikes;
        Ok(())
    }

    fn strike_threshold(&mut self) -> Result<u8, SensorError> {
        self.check()?;
        Ok(if self.strikes == 0 { 1 } else { self.strikes })
    }

    fn read_interrupt(&mut self) -> Result<u8, SensorError> {
        self.check()?;
        Ok(self.interrupts.pop_front().unwrap_or(0))
    }

    fn distance_km(&mut self) -> Result<u8, SensorError> {
        self.check()?;
        if self.fail_measurements {
            return Err(SensorError::Bus);
        }
        Ok(self.distance_km)
    }

    fn strike_energy(&mut self) -> Result<u32, SensorError> {
        self.check()?;
        if self.fail_measurements {
            return Err(SensorError::Bus);
        }
        Ok(self.energy)
    }
}

// ── IRQ pin ───────────────────────────────────────────────────

/// Input pin that replays scripted levels, then reads LOW.
pub struct FakePin {
    pub levels: VecDeque<Result<bool, ErrorKind>>,
}

#[allow(dead_code)]
impl FakePin {
    pub fn low() -> Self {
        Self {
            levels: VecDeque::new(),
        }
    }

    pub fn high_once() -> Self {
        Self {
            levels: VecDeque::from([Ok(true)]),
        }
    }

    pub fn broken() -> Self {
        Self {
            levels: VecDeque::from([Err(ErrorKind::Other)]),
        }
    }

    pub fn push_high(&mut self) {
        self.levels.push_back(Ok(true));
    }
}

impl ErrorType for FakePin {
    type Error = ErrorKind;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.levels.pop_front().unwrap_or(Ok(false))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

// ── Network ───────────────────────────────────────────────────

pub const FAKE_MAC: [u8; 6] = [0x24, 0x0A, 0xC4, 0x12, 0xAB, 0xEF];

/// WiFi link that associates after a scripted number of polls.
pub struct FakeNet {
    pub associated: bool,
    pub polls_to_associate: u32,
    pub begin_calls: u32,
    pub begin_error: Option<ConnectivityError>,
    pending: Option<u32>,
}

#[allow(dead_code)]
impl FakeNet {
    pub fn up() -> Self {
        Self {
            associated: true,
            polls_to_associate: 0,
            begin_calls: 0,
            begin_error: None,
            pending: None,
        }
    }

    pub fn down(polls_to_associate: u32) -> Self {
        Self {
            associated: false,
            polls_to_associate,
            ..Self::up()
        }
    }
}

impl NetworkPort for FakeNet {
    fn begin(&mut self) -> Result<(), ConnectivityError> {
        self.begin_calls += 1;
        if let Some(e) = self.begin_error {
            return Err(e);
        }
        self.pending = Some(self.polls_to_associate);
        Ok(())
    }

    fn is_associated(&mut self) -> bool {
        if self.associated {
            return true;
        }
        match self.pending.as_mut() {
            Some(0) => {
                self.associated = true;
                true
            }
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }

    fn local_ip(&mut self) -> Option<[u8; 4]> {
        self.associated.then_some([10, 0, 0, 7])
    }

    fn mac_address(&mut self) -> [u8; 6] {
        FAKE_MAC
    }
}

// ── Broker ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub retain: bool,
}

/// Broker that replays scripted connect outcomes (then succeeds) and
/// records every publish.
pub struct FakeBroker {
    pub connected: bool,
    pub connect_results: VecDeque<Result<(), BrokerError>>,
    pub connect_ids: Vec<String>,
    pub published: Vec<Published>,
}

#[allow(dead_code)]
impl FakeBroker {
    pub fn new() -> Self {
        Self {
            connected: false,
            connect_results: VecDeque::new(),
            connect_ids: Vec::new(),
            published: Vec::new(),
        }
    }

    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::new()
        }
    }

    pub fn failing(times: usize, error: BrokerError) -> Self {
        Self {
            connect_results: std::iter::repeat_n(Err(error), times).collect(),
            ..Self::new()
        }
    }

    pub fn on_topic(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|p| p.topic == topic)
            .map(|p| p.payload.as_str())
            .collect()
    }
}

impl Default for FakeBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerPort for FakeBroker {
    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn connect(&mut self, client_id: &str) -> Result<(), BrokerError> {
        self.connect_ids.push(client_id.to_string());
        let result = self.connect_results.pop_front().unwrap_or(Ok(()));
        self.connected = result.is_ok();
        result
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), BrokerError> {
        if !self.connected {
            return Err(BrokerError::NotConnected);
        }
        self.published.push(Published {
            topic: topic.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
            retain,
        });
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records every millisecond pause instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub pauses_ms: Vec<u32>,
}

#[allow(dead_code)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, ms: u32) -> usize {
        self.pauses_ms.iter().filter(|&&p| p == ms).count()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
