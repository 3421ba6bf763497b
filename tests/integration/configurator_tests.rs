//! Integration tests for detector probe and configuration.

use stormwatch::app::configurator::initialize;
use stormwatch::app::events::{AppEvent, Readback};
use stormwatch::config::{AfeMode, DetectorConfig};
use stormwatch::error::{ConfigError, SensorError};

use crate::mock_hw::{FakeDetector, RecordingSink};

#[test]
fn settings_are_written_in_fixed_order() {
    let mut det = FakeDetector::new();
    let mut sink = RecordingSink::new();

    initialize(&mut det, &DetectorConfig::default(), &mut sink).unwrap();

    assert_eq!(
        det.writes,
        vec![
            "afe_mode",
            "disturber_mask",
            "noise_floor",
            "watchdog_threshold",
            "spike_rejection",
            "strike_threshold",
        ]
    );
}

#[test]
fn every_setting_is_read_back() {
    let mut det = FakeDetector::new();
    let mut sink = RecordingSink::new();
    let config = DetectorConfig {
        afe_mode: AfeMode::Indoor,
        mask_disturbers: true,
        noise_floor: 3,
        watchdog_threshold: 4,
        spike_rejection: 5,
        strike_threshold: 9,
    };

    let rb = initialize(&mut det, &config, &mut sink).unwrap();

    assert_eq!(rb.afe_mode, Some(Some(AfeMode::Indoor)));
    assert_eq!(rb.disturbers_masked, Some(true));
    assert_eq!(rb.noise_floor, Some(3));
    assert_eq!(rb.watchdog_threshold, Some(4));
    assert_eq!(rb.spike_rejection, Some(5));
    assert_eq!(rb.strike_threshold, Some(9));

    let readbacks: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Readback(r) => Some(*r),
            _ => None,
        })
        .collect();
    assert_eq!(
        readbacks,
        vec![
            Readback::AfeMode(Some(AfeMode::Indoor)),
            Readback::DisturbersMasked(true),
            Readback::NoiseFloor(3),
            Readback::WatchdogThreshold(4),
            Readback::SpikeRejection(5),
            Readback::StrikeThreshold(9),
        ]
    );
}

#[test]
fn missing_detector_is_fatal_and_writes_nothing() {
    let mut det = FakeDetector::missing();
    let mut sink = RecordingSink::new();

    let r = initialize(&mut det, &DetectorConfig::default(), &mut sink);

    assert_eq!(r.unwrap_err(), SensorError::NotResponding);
    assert_eq!(
        sink.events,
        vec![AppEvent::DetectorMissing(SensorError::NotResponding)]
    );
    assert!(det.writes.is_empty());
}

#[test]
fn out_of_range_values_warn_and_are_still_written() {
    let mut det = FakeDetector::new();
    let mut sink = RecordingSink::new();
    let config = DetectorConfig {
        noise_floor: 0,
        watchdog_threshold: 12,
        ..DetectorConfig::default()
    };

    let rb = initialize(&mut det, &config, &mut sink).unwrap();

    assert!(sink.contains(&AppEvent::ConfigOutOfRange(ConfigError::OutOfRange(
        "noise_floor"
    ))));
    assert!(sink.contains(&AppEvent::ConfigOutOfRange(ConfigError::OutOfRange(
        "watchdog_threshold"
    ))));
    assert_eq!(det.writes.len(), 6);
    assert_eq!(rb.watchdog_threshold, Some(12));
    assert_eq!(rb.noise_floor, Some(0));
}

#[test]
fn unencodable_strike_threshold_is_reported_and_skipped() {
    let mut det = FakeDetector::new();
    let mut sink = RecordingSink::new();
    let config = DetectorConfig {
        strike_threshold: 3,
        ..DetectorConfig::default()
    };

    let rb = initialize(&mut det, &config, &mut sink).unwrap();

    assert!(sink.contains(&AppEvent::SettingFailed {
        setting: "strike_threshold",
        error: SensorError::InvalidSetting("strike_threshold"),
    }));
    // Chip keeps its power-on value.
    assert_eq!(rb.strike_threshold, Some(1));
}
