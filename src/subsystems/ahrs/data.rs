//! Fused IMU sample
//!
//! One reading of the pipeline: sensor vectors plus the fused orientation.
//! A single mutable instance lives inside the shared tracker state and is
//! overwritten in place each acquire cycle; consumers copy it out.

use nalgebra::{Quaternion, Vector3};

/// One fused IMU reading
///
/// The timestamp is a wrapping millisecond tick count. It is only ever
/// compared for equality (see [`ImuReader::read_if_changed`]), never ordered,
/// so wraparound over long uptimes is harmless.
///
/// [`ImuReader::read_if_changed`]: super::ImuReader::read_if_changed
#[derive(Debug, Clone, Copy)]
pub struct ImuSample {
    /// Capture time, wrapping milliseconds since startup
    pub timestamp_ms: u32,

    /// Acceleration in g (body frame, gravity included)
    pub accel: Vector3<f32>,

    /// Angular rate in deg/s (body frame, bias-corrected)
    pub gyro: Vector3<f32>,

    /// Orientation as a unit quaternion (w, x, y, z)
    pub orientation: Quaternion<f32>,
}

impl Default for ImuSample {
    fn default() -> Self {
        Self {
            timestamp_ms: 0,
            accel: Vector3::zeros(),
            gyro: Vector3::zeros(),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}
