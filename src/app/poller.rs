//! IRQ sampling and interrupt dispatch.
//!
//! The poller is a two-state machine driven by the IRQ line: **Idle** while
//! it reads LOW, **Event** when it reads HIGH.  On Event the interrupt
//! register is read exactly once and the cause decides what happens next.

use embedded_hal::digital::InputPin;
use log::trace;

use crate::error::SensorError;

use super::events::AppEvent;
use super::ports::{BrokerPort, DetectorPort, EventSink};
use super::publisher;

/// INT register value for a noise-level alarm.
pub const INT_NOISE: u8 = 0x01;
/// INT register value for a disturber (man-made) event.
pub const INT_DISTURBER: u8 = 0x04;
/// INT register value for a confirmed lightning strike.
pub const INT_LIGHTNING: u8 = 0x08;

/// Meaning of one interrupt register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    Noise,
    Disturber,
    Lightning,
    /// No mask matched.  Dropped without action.
    Unrecognized(u8),
}

impl InterruptKind {
    /// Exact match against the three known causes.
    pub const fn classify(value: u8) -> Self {
        match value {
            INT_NOISE => Self::Noise,
            INT_DISTURBER => Self::Disturber,
            INT_LIGHTNING => Self::Lightning,
            other => Self::Unrecognized(other),
        }
    }
}

/// Result of one poll pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// IRQ line low; nothing read.
    Idle,
    Noise,
    Disturber,
    Strike { distance_km: u8, energy: u32 },
    Unrecognized(u8),
    /// The interrupt register could not be read.
    InterruptReadFailed(SensorError),
    /// A strike was latched but its distance or energy could not be read.
    MeasurementFailed { interrupt: u8, error: SensorError },
}

impl PollOutcome {
    /// Raw interrupt register value this pass consumed, if any.
    pub const fn interrupt_value(self) -> Option<u8> {
        match self {
            Self::Noise => Some(INT_NOISE),
            Self::Disturber => Some(INT_DISTURBER),
            Self::Strike { .. } => Some(INT_LIGHTNING),
            Self::Unrecognized(v) => Some(v),
            Self::MeasurementFailed { interrupt, .. } => Some(interrupt),
            Self::Idle | Self::InterruptReadFailed(_) => None,
        }
    }
}

/// Sample the IRQ line and, if HIGH, handle the latched interrupt.
///
/// A pin that cannot be read is treated as LOW.
pub fn poll_once(
    detector: &mut impl DetectorPort,
    irq: &mut impl InputPin,
    broker: &mut impl BrokerPort,
    sink: &mut impl EventSink,
) -> PollOutcome {
    let high = irq.is_high().unwrap_or_else(|_| {
        sink.emit(&AppEvent::PinReadFailed);
        false
    });
    if !high {
        return PollOutcome::Idle;
    }

    let value = match detector.read_interrupt() {
        Ok(v) => v,
        Err(e) => {
            sink.emit(&AppEvent::ReadFailed(e));
            return PollOutcome::InterruptReadFailed(e);
        }
    };

    dispatch(InterruptKind::classify(value), detector, broker, sink)
}

/// Act on a classified interrupt.
pub fn dispatch(
    kind: InterruptKind,
    detector: &mut impl DetectorPort,
    broker: &mut impl BrokerPort,
    sink: &mut impl EventSink,
) -> PollOutcome {
    match kind {
        InterruptKind::Noise => {
            sink.emit(&AppEvent::Noise);
            PollOutcome::Noise
        }
        InterruptKind::Disturber => {
            sink.emit(&AppEvent::Disturber);
            PollOutcome::Disturber
        }
        InterruptKind::Lightning => {
            let measured = detector
                .distance_km()
                .and_then(|d| detector.strike_energy().map(|e| (d, e)));
            match measured {
                Ok((distance_km, energy)) => {
                    sink.emit(&AppEvent::Strike {
                        distance_km,
                        energy,
                    });
                    publisher::publish_strike(broker, distance_km, energy);
                    PollOutcome::Strike {
                        distance_km,
                        energy,
                    }
                }
                Err(e) => {
                    sink.emit(&AppEvent::ReadFailed(e));
                    PollOutcome::MeasurementFailed {
                        interrupt: INT_LIGHTNING,
                        error: e,
                    }
                }
            }
        }
        InterruptKind::Unrecognized(v) => {
            trace!("IRQ with unrecognised cause 0x{:02X}", v);
            sink.emit(&AppEvent::UnrecognizedInterrupt(v));
            PollOutcome::Unrecognized(v)
        }
    }
}
