//! AHRS subsystem: orientation estimation and gyro bias calibration
//!
//! Owns the sensor-to-quaternion pipeline:
//!
//! - [`ImuSample`]: one fused reading (timestamp, accel, gyro, quaternion)
//! - [`BiasAccumulator`]: running-average gyro bias estimator
//! - [`FusionFilter`] / [`Mahony`]: the orientation filter seam
//! - [`ImuReader`]: sensor + filter + bias correction
//! - [`SharedTrackerState`]: the single lock-guarded shared record
//! - [`run_acquire_task`]: the periodic acquire loop with the calibration
//!   state machine

pub mod bias;
pub mod data;
pub mod fusion;
pub mod reader;
pub mod state;
pub mod task;

pub use bias::BiasAccumulator;
pub use data::ImuSample;
pub use fusion::{FusionFilter, Mahony, MahonyConfig};
pub use reader::ImuReader;
pub use state::{SharedTrackerState, StateLockTimeout, TrackerMode, TrackerState};
pub use task::{acquire_cycle, run_acquire_task, AcquireConfig};
