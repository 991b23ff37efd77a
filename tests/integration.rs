//! End-to-end scenarios across the task pipeline
//!
//! Drives the per-tick cycle functions directly with mock collaborators and
//! a hand-advanced clock, so each scenario is deterministic on the host.

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use nalgebra::Vector3;
use quatcast::communication::commands::CommandContext;
use quatcast::communication::control::ControlMessage;
use quatcast::communication::task::ingest_cycle;
use quatcast::parameters::node::SharedNodeConfig;
use quatcast::platform::mock::{
    MockControlChannel, MockImu, MockIndicator, MockStore, MockSystem, MockTransport,
};
use quatcast::subsystems::ahrs::fusion::Mahony;
use quatcast::subsystems::ahrs::reader::ImuReader;
use quatcast::subsystems::ahrs::state::{SharedTrackerState, TrackerMode};
use quatcast::subsystems::ahrs::task::acquire_cycle;
use quatcast::subsystems::telemetry::task::publish_cycle;

const LOCK_TIMEOUT: Duration = Duration::from_millis(100);
const WINDOW: usize = 50;

/// The whole node, minus the executors
struct Harness {
    state: SharedTrackerState,
    config: SharedNodeConfig,
    store: Mutex<CriticalSectionRawMutex, MockStore>,
    notify: Signal<CriticalSectionRawMutex, ()>,
    system: MockSystem,
    reader: ImuReader<MockImu, Mahony>,
    transport: MockTransport,
    channel: MockControlChannel,
    now_ms: u32,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: SharedTrackerState::new(WINDOW),
            config: SharedNodeConfig::default(),
            store: Mutex::new(MockStore::new()),
            notify: Signal::new(),
            system: MockSystem::new(),
            reader: ImuReader::new(MockImu::new(), Mahony::default(), 200),
            transport: MockTransport::new(),
            channel: MockControlChannel::new(),
            now_ms: 0,
        }
    }

    /// One acquire tick, 5 ms later than the previous one
    fn acquire(&mut self) {
        self.now_ms += 5;
        block_on(acquire_cycle(
            &self.state,
            &self.store,
            &mut self.reader,
            self.now_ms,
            LOCK_TIMEOUT,
        ));
    }

    fn publish(&mut self) {
        block_on(publish_cycle(
            &self.state,
            &self.config,
            &mut self.transport,
            LOCK_TIMEOUT,
        ));
    }

    /// Queue a control message and run one ingest tick
    fn command(&mut self, name: &str, arg: Option<&str>) {
        let msg = ControlMessage::new(name, arg).unwrap();
        self.channel.queue(msg);
        let mut ctx = CommandContext {
            state: &self.state,
            config: &self.config,
            store: &self.store,
            notify: &self.notify,
            system: &mut self.system,
            lock_timeout: LOCK_TIMEOUT,
        };
        block_on(ingest_cycle(&mut self.channel, &mut ctx));
    }

    fn mode(&self) -> TrackerMode {
        self.state.try_lock().unwrap().mode
    }
}

#[test]
fn calibration_gates_publishing_and_persists_the_bias() {
    let mut h = Harness::new();
    h.reader.sensor_mut().set_gyro(Vector3::new(1.0, 2.0, 3.0));

    // Tracking: acquire then publish transmits.
    h.acquire();
    h.publish();
    assert_eq!(h.transport.sent.len(), 1);

    h.command("start-calibration", None);
    assert_eq!(h.mode(), TrackerMode::Calibrating);
    assert!(h.notify.try_take().is_some());

    // Nothing goes out while the window fills.
    for _ in 0..WINDOW - 1 {
        h.acquire();
        h.publish();
    }
    assert_eq!(h.transport.sent.len(), 1);
    assert_eq!(h.mode(), TrackerMode::Calibrating);

    // The filling sample completes the window: raw rate averaged, installed
    // and persisted once.
    h.acquire();
    assert_eq!(h.mode(), TrackerMode::Tracking);
    assert_eq!(h.reader.bias(), Vector3::new(1.0, 2.0, 3.0));
    {
        let store = h.store.try_lock().unwrap();
        assert_eq!(store.gyro_bias_writes, 1);
        assert_eq!(store.stored_gyro_bias(), Some(Vector3::new(1.0, 2.0, 3.0)));
    }

    // Publishing resumes, and the corrected rate is now zero.
    h.acquire();
    h.publish();
    assert_eq!(h.transport.sent.len(), 2);
    let tracker = h.state.try_lock().unwrap();
    assert_eq!(tracker.sample.gyro, Vector3::zeros());
}

#[test]
fn set_destination_redirects_the_next_publish() {
    let mut h = Harness::new();
    h.acquire();

    h.publish();
    assert_eq!(h.transport.sent[0].destination.as_str(), "10.0.0.116:33333");
    assert_eq!(h.transport.sent[0].path.as_str(), "/default/quat");

    h.command("set-destination", Some("host:9000"));
    h.command("set-identity", Some("stick-07"));

    h.acquire();
    h.publish();
    let last = h.transport.sent.last().unwrap();
    assert_eq!(last.destination.as_str(), "host:9000");
    assert_eq!(last.path.as_str(), "/stick-07/quat");

    let store = h.store.try_lock().unwrap();
    assert_eq!(store.destination_writes, 1);
    assert_eq!(store.identity_writes, 1);
    assert_eq!(store.stored_destination(), Some("host:9000"));
    assert_eq!(store.stored_identity(), Some("stick-07"));
}

#[test]
fn reset_sensor_reinitializes_without_losing_the_bias() {
    let mut h = Harness::new();
    h.reader.set_bias(Vector3::new(0.1, 0.2, 0.3));

    h.command("reset-sensor", None);
    assert!(h.state.try_lock().unwrap().reinit_requested);

    // The next acquire tick services the request instead of sampling.
    h.acquire();
    assert_eq!(h.reader.sensor_mut().init_count(), 1);
    assert_eq!(h.reader.bias(), Vector3::new(0.1, 0.2, 0.3));
    assert!(!h.state.try_lock().unwrap().reinit_requested);

    // Ordinary sampling continues afterwards.
    h.acquire();
    assert_eq!(h.state.try_lock().unwrap().sample.timestamp_ms, h.now_ms);
}

#[test]
fn held_lock_skips_one_cycle_of_each_consumer() {
    let mut h = Harness::new();
    h.reader.sensor_mut().set_gyro(Vector3::new(1.0, 0.0, 0.0));
    h.acquire();
    let stamped = h.now_ms;

    {
        let _held = h.state.try_lock().unwrap();

        h.now_ms += 5;
        block_on(acquire_cycle(
            &h.state,
            &h.store,
            &mut h.reader,
            h.now_ms,
            Duration::from_millis(5),
        ));
        block_on(publish_cycle(
            &h.state,
            &h.config,
            &mut h.transport,
            Duration::from_millis(5),
        ));
    }

    // Both consumers skipped; shared state still carries the earlier sample.
    assert!(h.transport.sent.is_empty());
    assert_eq!(h.state.try_lock().unwrap().sample.timestamp_ms, stamped);

    // The next ticks proceed normally.
    h.acquire();
    h.publish();
    assert_eq!(h.transport.sent.len(), 1);
}

#[test]
fn restart_command_pulses_the_indicator_and_restarts() {
    let mut h = Harness::new();
    h.command("restart", None);
    assert_eq!(h.system.restarts, 1);

    // The coalescing signal drives one acknowledge pulse.
    let mut indicator = MockIndicator::new();
    block_on(async {
        use embassy_futures::select::select;
        use embassy_time::Timer;
        let run = quatcast::subsystems::indicator::task::run_indicator_task(
            &h.notify,
            &mut indicator,
        );
        let stop = Timer::after(Duration::from_millis(50));
        let _ = select(run, stop).await;
    });
    assert_eq!(indicator.transitions.as_slice(), &[false, true]);
}

#[test]
fn malformed_restart_is_ignored() {
    let mut h = Harness::new();
    h.command("restart", Some("please"));
    assert_eq!(h.system.restarts, 0);
    assert!(h.notify.try_take().is_none());
}
