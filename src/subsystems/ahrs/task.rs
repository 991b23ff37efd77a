//! Acquire task: periodic sensor fusion and the calibration state machine
//!
//! Highest-rate task in the node. Each tick it takes the tracker lock with a
//! bounded wait, advances the fusion estimate, copies the fresh sample into
//! shared state and, while calibrating, feeds the bias window - performing
//! the Calibrating -> Tracking transition entirely inside the critical
//! section so the bias swap is atomic with respect to concurrent readers.
//!
//! The loop body is total: sensor errors and lock timeouts skip the cycle,
//! they never terminate the loop.

use super::fusion::FusionFilter;
use super::reader::ImuReader;
use super::state::{SharedTrackerState, TrackerMode};
use crate::devices::traits::ImuSensor;
use crate::parameters::store::SettingsStore;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker};

/// Acquire task timing
#[derive(Debug, Clone, Copy)]
pub struct AcquireConfig {
    /// Tick period (sensor-limited; 5 ms = 200 Hz)
    pub period: Duration,

    /// Bounded wait for the tracker lock
    pub lock_timeout: Duration,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(5),
            lock_timeout: Duration::from_millis(1000),
        }
    }
}

/// One acquire tick
///
/// Split out of [`run_acquire_task`] so host tests can drive the pipeline
/// cycle by cycle with a controlled clock.
pub async fn acquire_cycle<S, F, P>(
    state: &SharedTrackerState,
    store: &Mutex<CriticalSectionRawMutex, P>,
    reader: &mut ImuReader<S, F>,
    now_ms: u32,
    lock_timeout: Duration,
) where
    S: ImuSensor,
    F: FusionFilter,
    P: SettingsStore,
{
    let Ok(mut tracker) = state.lock(lock_timeout).await else {
        return; // skipped cycle, next tick proceeds normally
    };

    // Service a pending sensor reset: take the request under the lock, run
    // the (potentially slow) bring-up after releasing it. The installed bias
    // survives reinitialization.
    if tracker.reinit_requested {
        tracker.reinit_requested = false;
        drop(tracker);
        if reader.reinitialize().await.is_err() {
            crate::log_error!("sensor reinitialization failed");
        } else {
            crate::log_info!("sensor reinitialized, bias reapplied");
        }
        return;
    }

    // Normal cycle: read-modify-write entirely under the lock.
    match reader.update(now_ms).await {
        Ok(()) => {
            if let Some(sample) = reader.read_if_changed(tracker.sample.timestamp_ms) {
                tracker.sample = sample;
            }

            if tracker.mode == TrackerMode::Calibrating {
                let raw = reader.raw_gyro();
                if !tracker.window.push(raw) {
                    // This push filled the window: install, persist, then
                    // flip the mode. Readers can never observe Tracking with
                    // a half-applied bias.
                    if let Some(bias) = tracker.window.average() {
                        reader.set_bias(bias);
                        let mut store = store.lock().await;
                        if store.write_gyro_bias(bias).is_err() {
                            crate::log_warn!("failed to persist gyro bias");
                        }
                        crate::log_info!(
                            "gyro bias calibrated: ({}, {}, {})",
                            bias.x,
                            bias.y,
                            bias.z
                        );
                    }
                    tracker.window.reset();
                    tracker.mode = TrackerMode::Tracking;
                }
            }
        }
        Err(_e) => {
            // Skipped cycle; the sensor may recover on the next tick.
            crate::log_warn!("imu read failed: {:?}", _e);
        }
    }
}

/// Acquire task loop
///
/// Fixed-period scheduling via [`Ticker`]: do the work, then wait for the
/// next tick (`period - elapsed`, clamped to zero).
pub async fn run_acquire_task<S, F, P>(
    state: &SharedTrackerState,
    store: &Mutex<CriticalSectionRawMutex, P>,
    reader: &mut ImuReader<S, F>,
    config: AcquireConfig,
) where
    S: ImuSensor,
    F: FusionFilter,
    P: SettingsStore,
{
    let mut ticker = Ticker::every(config.period);
    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis() as u32;
        acquire_cycle(state, store, reader, now_ms, config.lock_timeout).await;
    }
}
