//! Station: the orchestrator context.
//!
//! [`Station`] owns the state the firmware carries between loop passes
//! (status counter, last interrupt value) and wires the configurator,
//! bootstrapper, poller and publisher together.  All I/O flows through
//! port traits passed in at call sites, so the whole loop runs on the host
//! against fakes.
//!
//! ```text
//!  DetectorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!  InputPin     ──▶ │          Station           │
//!  NetworkPort  ◀──▶│ configure · connect · poll │ ──▶ BrokerPort
//!  DelayNs      ◀── └────────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::info;

use crate::config::StationConfig;
use crate::error::Result;

use super::bootstrap::{self, LinkStatus, StatusCounter};
use super::configurator::{self, DetectorReadback};
use super::events::AppEvent;
use super::poller::{self, PollOutcome};
use super::ports::{BrokerPort, DetectorPort, EventSink, NetworkPort};

/// Loop passes between heartbeat events (one minute at the default pace).
pub const HEARTBEAT_PASSES: u64 = 600;

/// Peripherals the steady-state loop needs on every pass.
pub struct Io<'a, D, P, N, B, T, S> {
    pub detector: &'a mut D,
    pub irq: &'a mut P,
    pub net: &'a mut N,
    pub broker: &'a mut B,
    pub delay: &'a mut T,
    pub sink: &'a mut S,
}

/// Orchestrator context.
pub struct Station {
    config: StationConfig,
    status: StatusCounter,
    last_interrupt: Option<u8>,
    passes: u64,
}

impl Station {
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            status: StatusCounter::new(),
            last_interrupt: None,
            passes: 0,
        }
    }

    // ── Startup ───────────────────────────────────────────────

    /// Probe and configure the detector.
    ///
    /// An `Err` means the chip did not answer; the caller halts.
    pub fn bring_up_detector(
        &mut self,
        detector: &mut impl DetectorPort,
        sink: &mut impl EventSink,
    ) -> Result<DetectorReadback> {
        sink.emit(&AppEvent::Started);
        let readback = configurator::initialize(detector, &self.config.detector, sink)?;
        info!("Detector configured: {:?}", readback);
        Ok(readback)
    }

    /// Startup pause, then block until WiFi is up.
    pub fn bring_up_network(
        &mut self,
        net: &mut impl NetworkPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        delay.delay_ms(self.config.timing.startup_delay_ms);
        bootstrap::join_network(net, delay, &self.config.network, &self.config.timing, sink)?;
        Ok(())
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Reconnect if needed.  Exposed for callers that drive the loop
    /// themselves.
    pub fn ensure_connected(
        &mut self,
        net: &mut impl NetworkPort,
        broker: &mut impl BrokerPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> LinkStatus {
        bootstrap::ensure_connected(
            net,
            broker,
            delay,
            &self.config.network,
            &self.config.timing,
            &mut self.status,
            sink,
        )
    }

    /// One full loop pass: connectivity, IRQ poll, fixed pause.
    pub fn tick<D, P, N, B, T, S>(&mut self, io: &mut Io<'_, D, P, N, B, T, S>) -> PollOutcome
    where
        D: DetectorPort,
        P: InputPin,
        N: NetworkPort,
        B: BrokerPort,
        T: DelayNs,
        S: EventSink,
    {
        self.passes += 1;

        let _ = self.ensure_connected(
            &mut *io.net,
            &mut *io.broker,
            &mut *io.delay,
            &mut *io.sink,
        );

        let outcome = poller::poll_once(
            &mut *io.detector,
            &mut *io.irq,
            &mut *io.broker,
            &mut *io.sink,
        );
        if let Some(v) = outcome.interrupt_value() {
            self.last_interrupt = Some(v);
        }
        if self.passes() % HEARTBEAT_PASSES == 0 {
            io.sink.emit(&AppEvent::Heartbeat {
                passes: self.passes(),
                last_interrupt: self.last_interrupt(),
            });
        }

        io.delay.delay_ms(self.config.timing.poll_interval_ms);
        outcome
    }

    /// Run [`tick`](Self::tick) forever.
    pub fn run<D, P, N, B, T, S>(&mut self, mut io: Io<'_, D, P, N, B, T, S>) -> !
    where
        D: DetectorPort,
        P: InputPin,
        N: NetworkPort,
        B: BrokerPort,
        T: DelayNs,
        S: EventSink,
    {
        info!("Entering poll loop ({} ms)", self.config.timing.poll_interval_ms);
        loop {
            self.tick(&mut io);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Value the next successful connect will publish.
    pub fn next_status(&self) -> u8 {
        self.status.peek()
    }

    /// Most recent interrupt register value consumed by the poller.
    pub fn last_interrupt(&self) -> Option<u8> {
        self.last_interrupt
    }

    /// Loop passes executed since startup.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }
}
