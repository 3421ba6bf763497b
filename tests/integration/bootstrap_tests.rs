//! Integration tests for WiFi join and broker (re)connection.

use stormwatch::app::bootstrap::{LinkStatus, StatusCounter, ensure_connected, join_network};
use stormwatch::app::events::AppEvent;
use stormwatch::app::ports::{BrokerError, ConnectivityError};
use stormwatch::app::publisher::TOPIC_STATUS;
use stormwatch::config::{NetworkConfig, TimingConfig};

use crate::mock_hw::{FakeBroker, FakeNet, RecordingDelay, RecordingSink};

fn network() -> NetworkConfig {
    NetworkConfig {
        wifi_ssid: "StormNet",
        ..NetworkConfig::default()
    }
}

// ── WiFi ──────────────────────────────────────────────────────

#[test]
fn join_waits_half_a_second_per_failed_check() {
    let mut net = FakeNet::down(3);
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    join_network(&mut net, &mut delay, &network(), &TimingConfig::default(), &mut sink).unwrap();

    assert_eq!(net.begin_calls, 1);
    assert_eq!(delay.pauses_ms, vec![500, 500, 500]);
    assert_eq!(sink.count(|e| *e == AppEvent::WifiWaiting), 3);
    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::WifiConnecting { ssid: "StormNet" })
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::WifiConnected {
            ip: Some([10, 0, 0, 7])
        })
    );
}

#[test]
fn join_returns_early_when_begin_is_rejected() {
    let mut net = FakeNet::down(0);
    net.begin_error = Some(ConnectivityError::NoCredentials);
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    let r = join_network(&mut net, &mut delay, &network(), &TimingConfig::default(), &mut sink);

    assert_eq!(r, Err(ConnectivityError::NoCredentials));
    assert!(delay.pauses_ms.is_empty());
}

// ── Broker ────────────────────────────────────────────────────

struct Rig {
    net: FakeNet,
    broker: FakeBroker,
    delay: RecordingDelay,
    counter: StatusCounter,
    sink: RecordingSink,
}

impl Rig {
    fn new(broker: FakeBroker) -> Self {
        Self {
            net: FakeNet::up(),
            broker,
            delay: RecordingDelay::new(),
            counter: StatusCounter::new(),
            sink: RecordingSink::new(),
        }
    }

    fn pass(&mut self) -> LinkStatus {
        ensure_connected(
            &mut self.net,
            &mut self.broker,
            &mut self.delay,
            &network(),
            &TimingConfig::default(),
            &mut self.counter,
            &mut self.sink,
        )
    }
}

#[test]
fn connected_session_is_left_alone() {
    let mut rig = Rig::new(FakeBroker::connected());

    assert_eq!(rig.pass(), LinkStatus::AlreadyConnected);
    assert!(rig.broker.connect_ids.is_empty());
    assert!(rig.broker.published.is_empty());
    assert!(rig.delay.pauses_ms.is_empty());
    assert!(rig.sink.events.is_empty());
}

#[test]
fn three_refusals_then_success() {
    let mut rig = Rig::new(FakeBroker::failing(3, BrokerError::Refused(5)));

    for _ in 0..3 {
        assert_eq!(rig.pass(), LinkStatus::Failed(BrokerError::Refused(5)));
        assert!(rig.broker.on_topic(TOPIC_STATUS).is_empty());
    }
    assert_eq!(rig.delay.count(2_000), 3);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::BrokerConnectFailed(BrokerError::Refused(5)))),
        3
    );

    assert_eq!(rig.pass(), LinkStatus::Reconnected { status: 0 });
    assert_eq!(rig.broker.on_topic(TOPIC_STATUS), vec!["0"]);
    assert_eq!(rig.delay.count(2_000), 3, "no pause after a successful connect");
}

#[test]
fn client_id_derives_from_station_mac() {
    let mut rig = Rig::new(FakeBroker::new());
    rig.pass();

    assert_eq!(rig.broker.connect_ids, vec!["esp32-client-24:0A:C4:12:AB:EF"]);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::BrokerConnected { client_id } if client_id.as_str() == "esp32-client-24:0A:C4:12:AB:EF"
    )));
}

#[test]
fn status_counter_wraps_across_reconnects() {
    let mut rig = Rig::new(FakeBroker::new());

    for _ in 0..12 {
        rig.pass();
        rig.broker.connected = false;
    }

    assert_eq!(
        rig.broker.on_topic(TOPIC_STATUS),
        vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "1", "2"]
    );
    assert!(rig.broker.published.iter().all(|p| p.retain));
}

#[test]
fn lost_wifi_is_rejoined_before_connecting() {
    let mut rig = Rig::new(FakeBroker::new());
    rig.net = FakeNet::down(1);

    assert_eq!(rig.pass(), LinkStatus::Reconnected { status: 0 });
    assert_eq!(rig.net.begin_calls, 1);
    assert_eq!(rig.delay.pauses_ms, vec![500]);
}

#[test]
fn rejected_wifi_restart_pauses_and_skips_connect() {
    let mut rig = Rig::new(FakeBroker::new());
    rig.net = FakeNet::down(0);
    rig.net.begin_error = Some(ConnectivityError::ConnectionFailed);

    assert_eq!(
        rig.pass(),
        LinkStatus::NetworkDown(ConnectivityError::ConnectionFailed)
    );
    assert!(rig.broker.connect_ids.is_empty());
    assert_eq!(rig.delay.pauses_ms, vec![2_000]);
}
