//! One-shot detector bring-up.
//!
//! Probes the AS3935, then writes each setting in a fixed order and reads it
//! back for the console.  Nothing here makes decisions: a failed write or a
//! read-back that differs from the request is reported and configuration
//! carries on.  Only a failed probe stops the firmware.

use crate::config::{AfeMode, DetectorConfig};
use crate::error::SensorError;

use super::events::{AppEvent, Readback};
use super::ports::{DetectorPort, EventSink};

/// Values read back from the chip after configuration.  `None` where the
/// read-back itself failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorReadback {
    pub afe_mode: Option<Option<AfeMode>>,
    pub disturbers_masked: Option<bool>,
    pub noise_floor: Option<u8>,
    pub watchdog_threshold: Option<u8>,
    pub spike_rejection: Option<u8>,
    pub strike_threshold: Option<u8>,
}

/// Probe the detector and apply `config`.
///
/// Returns `Err` only when the probe fails; the caller treats that as fatal.
pub fn initialize(
    detector: &mut impl DetectorPort,
    config: &DetectorConfig,
    sink: &mut impl EventSink,
) -> Result<DetectorReadback, SensorError> {
    if let Err(e) = detector.probe() {
        sink.emit(&AppEvent::DetectorMissing(e));
        return Err(e);
    }
    sink.emit(&AppEvent::DetectorReady);

    for problem in config.out_of_range() {
        sink.emit(&AppEvent::ConfigOutOfRange(problem));
    }

    Ok(apply(detector, config, sink))
}

/// Write every setting, in order, reading each back.
pub fn apply(
    detector: &mut impl DetectorPort,
    config: &DetectorConfig,
    sink: &mut impl EventSink,
) -> DetectorReadback {
    let mut rb = DetectorReadback::default();

    write(sink, "afe_mode", detector.set_afe_mode(config.afe_mode));
    rb.afe_mode = read(sink, "afe_mode", detector.afe_mode(), Readback::AfeMode);

    write(
        sink,
        "disturber_mask",
        detector.set_disturbers_masked(config.mask_disturbers),
    );
    rb.disturbers_masked = read(
        sink,
        "disturber_mask",
        detector.disturbers_masked(),
        Readback::DisturbersMasked,
    );

    write(sink, "noise_floor", detector.set_noise_floor(config.noise_floor));
    rb.noise_floor = read(sink, "noise_floor", detector.noise_floor(), Readback::NoiseFloor);

    write(
        sink,
        "watchdog_threshold",
        detector.set_watchdog_threshold(config.watchdog_threshold),
    );
    rb.watchdog_threshold = read(
        sink,
        "watchdog_threshold",
        detector.watchdog_threshold(),
        Readback::WatchdogThreshold,
    );

    write(
        sink,
        "spike_rejection",
        detector.set_spike_rejection(config.spike_rejection),
    );
    rb.spike_rejection = read(
        sink,
        "spike_rejection",
        detector.spike_rejection(),
        Readback::SpikeRejection,
    );

    write(
        sink,
        "strike_threshold",
        detector.set_strike_threshold(config.strike_threshold),
    );
    rb.strike_threshold = read(
        sink,
        "strike_threshold",
        detector.strike_threshold(),
        Readback::StrikeThreshold,
    );

    rb
}

fn write(sink: &mut impl EventSink, setting: &'static str, result: Result<(), SensorError>) {
    if let Err(error) = result {
        sink.emit(&AppEvent::SettingFailed { setting, error });
    }
}

fn read<T: Copy>(
    sink: &mut impl EventSink,
    setting: &'static str,
    result: Result<T, SensorError>,
    wrap: fn(T) -> Readback,
) -> Option<T> {
    match result {
        Ok(value) => {
            sink.emit(&AppEvent::Readback(wrap(value)));
            Some(value)
        }
        Err(error) => {
            sink.emit(&AppEvent::SettingFailed { setting, error });
            None
        }
    }
}
