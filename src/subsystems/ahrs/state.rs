//! Shared tracker state for inter-task communication
//!
//! The single point of mutual exclusion in the node: one async mutex guards
//! the latest fused sample, the calibration mode and the calibration window.
//! Producer (acquire) and consumer (publish) both take the lock with a
//! bounded wait; a timeout means the cycle is skipped, never that the task
//! stalls.
//!
//! Discipline: the lock is held for a whole read-modify-write or copy-out,
//! and never across a network send.

use super::bias::BiasAccumulator;
use super::data::ImuSample;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard, TryLockError};
use embassy_time::{with_timeout, Duration};

/// Calibration mode of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackerMode {
    /// Normal operation: bias-corrected fusion, publishing enabled
    Tracking,
    /// Device presumed stationary, acquire cycles feed the bias window,
    /// publishing gated off
    Calibrating,
}

/// Everything guarded by the tracker lock
#[derive(Debug)]
pub struct TrackerState {
    /// Latest fused sample, overwritten in place each acquire cycle
    pub sample: ImuSample,

    /// Current calibration mode
    pub mode: TrackerMode,

    /// Gyro bias window, fed while `mode == Calibrating`
    pub window: BiasAccumulator,

    /// Set by the `reset-sensor` command, serviced by the acquire task
    pub reinit_requested: bool,
}

/// Bounded lock wait expired; the caller skips this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateLockTimeout;

/// Lock-guarded tracker state shared by all tasks
pub struct SharedTrackerState {
    inner: Mutex<CriticalSectionRawMutex, TrackerState>,
}

impl SharedTrackerState {
    /// Create tracker state with the given calibration window length
    pub fn new(window: usize) -> Self {
        Self {
            inner: Mutex::new(TrackerState {
                sample: ImuSample::default(),
                mode: TrackerMode::Tracking,
                window: BiasAccumulator::new(window),
                reinit_requested: false,
            }),
        }
    }

    /// Acquire the lock, waiting at most `timeout`
    ///
    /// On timeout the state is untouched and the caller proceeds to its next
    /// scheduled tick.
    pub async fn lock(
        &self,
        timeout: Duration,
    ) -> Result<MutexGuard<'_, CriticalSectionRawMutex, TrackerState>, StateLockTimeout> {
        with_timeout(timeout, self.inner.lock())
            .await
            .map_err(|_| StateLockTimeout)
    }

    /// Non-blocking acquisition attempt
    pub fn try_lock(
        &self,
    ) -> Result<MutexGuard<'_, CriticalSectionRawMutex, TrackerState>, TryLockError> {
        self.inner.try_lock()
    }
}
