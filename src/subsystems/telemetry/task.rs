//! Publish task: best-effort quaternion telemetry
//!
//! Medium-rate consumer of the tracker state. Copies the quaternion out
//! under the lock, releases, then performs the network send - the lock is
//! never held across the send. Publishing is gated by mode: while the node
//! is calibrating the orientation stream is meaningless (the device is
//! presumed stationary) and nothing is transmitted.
//!
//! A send failure is dropped, not retried: the next period carries fresher
//! data, so retrying stale data has no value.

use crate::communication::transport::TelemetryTransport;
use crate::parameters::node::{SharedNodeConfig, IDENTITY_MAX};
use crate::subsystems::ahrs::state::{SharedTrackerState, TrackerMode};
use core::fmt::Write;
use embassy_time::{Duration, Ticker};
use heapless::String;

/// Room for "/<identity>/quat"
pub const PATH_MAX: usize = IDENTITY_MAX + 8;

/// Publish task timing
#[derive(Debug, Clone, Copy)]
pub struct PublishConfig {
    /// Tick period (40 ms = 25 Hz)
    pub period: Duration,

    /// Bounded wait for the tracker lock
    pub lock_timeout: Duration,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(40),
            lock_timeout: Duration::from_millis(1000),
        }
    }
}

/// Telemetry address path for a node identity: `/<identity>/quat`
pub fn quat_path(identity: &str) -> String<PATH_MAX> {
    let mut path = String::new();
    // Identity is bounded by IDENTITY_MAX, so this cannot overflow.
    let _ = write!(path, "/{}/quat", identity);
    path
}

/// One publish tick
pub async fn publish_cycle<T: TelemetryTransport>(
    state: &SharedTrackerState,
    config: &SharedNodeConfig,
    transport: &mut T,
    lock_timeout: Duration,
) {
    // Copy out under the lock, then drop the guard before any I/O.
    let orientation = {
        let Ok(tracker) = state.lock(lock_timeout).await else {
            return; // skipped cycle
        };
        if tracker.mode != TrackerMode::Tracking {
            return; // gated off while calibrating
        }
        tracker.sample.orientation
    };

    let snapshot = config.snapshot();
    let path = quat_path(&snapshot.identity);
    let payload = [orientation.w, orientation.i, orientation.j, orientation.k];

    if transport
        .send(&snapshot.destination, &path, payload)
        .await
        .is_err()
    {
        // Dropped; the next cycle supersedes this sample anyway.
        crate::log_debug!("telemetry send failed");
    }
}

/// Publish task loop
pub async fn run_publish_task<T: TelemetryTransport>(
    state: &SharedTrackerState,
    config: &SharedNodeConfig,
    mut transport: T,
    task_config: PublishConfig,
) {
    let mut ticker = Ticker::every(task_config.period);
    loop {
        ticker.next().await;
        publish_cycle(state, config, &mut transport, task_config.lock_timeout).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockTransport;
    use embassy_futures::block_on;
    use nalgebra::Quaternion;

    const LOCK_TIMEOUT: Duration = Duration::from_millis(100);

    #[test]
    fn path_includes_identity() {
        assert_eq!(quat_path("default").as_str(), "/default/quat");
        assert_eq!(quat_path("stick-07").as_str(), "/stick-07/quat");
    }

    #[test]
    fn publishes_current_quaternion_to_configured_destination() {
        let state = SharedTrackerState::new(5);
        let config = SharedNodeConfig::default();
        let mut transport = MockTransport::new();
        config.set_destination("host:9000");
        config.set_identity("stick-07");

        {
            let mut tracker = state.try_lock().unwrap();
            tracker.sample.orientation = Quaternion::new(0.5, 0.5, 0.5, 0.5);
        }

        block_on(publish_cycle(&state, &config, &mut transport, LOCK_TIMEOUT));

        assert_eq!(transport.sent.len(), 1);
        let pkt = &transport.sent[0];
        assert_eq!(pkt.destination.as_str(), "host:9000");
        assert_eq!(pkt.path.as_str(), "/stick-07/quat");
        assert_eq!(pkt.payload, [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn gated_off_while_calibrating() {
        let state = SharedTrackerState::new(5);
        let config = SharedNodeConfig::default();
        let mut transport = MockTransport::new();

        {
            let mut tracker = state.try_lock().unwrap();
            tracker.mode = TrackerMode::Calibrating;
        }

        block_on(publish_cycle(&state, &config, &mut transport, LOCK_TIMEOUT));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn lock_timeout_skips_the_send() {
        let state = SharedTrackerState::new(5);
        let config = SharedNodeConfig::default();
        let mut transport = MockTransport::new();

        let _held = state.try_lock().unwrap();
        block_on(publish_cycle(
            &state,
            &config,
            &mut transport,
            Duration::from_millis(5),
        ));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn send_failure_is_swallowed() {
        let state = SharedTrackerState::new(5);
        let config = SharedNodeConfig::default();
        let mut transport = MockTransport::new();
        transport.fail_sends(true);

        // Must not panic; failure is logged and dropped.
        block_on(publish_cycle(&state, &config, &mut transport, LOCK_TIMEOUT));
        assert!(transport.sent.is_empty());
    }
}
