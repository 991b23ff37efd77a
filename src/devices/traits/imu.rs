//! IMU Sensor Trait
//!
//! Device-independent interface for raw inertial sensors. The AHRS subsystem
//! consumes this trait to obtain instantaneous acceleration and angular rate;
//! orientation fusion happens above this layer.
//!
//! ## Timing contract
//!
//! Both read methods must return promptly (bounded latency well below the
//! acquire period). A sensor that blocks longer than the acquire period breaks
//! the real-time behavior of the pipeline; that shows up as missed cycles, it
//! is not handled here.
//!
//! ## Usage
//!
//! ```ignore
//! use quatcast::devices::traits::{ImuSensor, ImuError};
//!
//! async fn sample<I: ImuSensor>(imu: &mut I) -> Result<(), ImuError> {
//!     let accel = imu.read_accel().await?;
//!     let gyro = imu.read_gyro().await?;
//!     // Feed the fusion filter...
//!     Ok(())
//! }
//! ```

use nalgebra::Vector3;

/// IMU sensor error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImuError {
    /// Bus communication failed (I2C/SPI)
    BusError,

    /// Sensor bring-up failed
    InitializationFailed,

    /// Sensor not initialized
    NotInitialized,

    /// Invalid data received from sensor
    InvalidData,

    /// Timeout waiting for data
    Timeout,
}

/// Raw IMU sensor interface
///
/// # Units and frame
///
/// - Acceleration in g, body frame, gravity included (not compensated)
/// - Angular rate in deg/s, body frame, uncorrected (bias handling is the
///   caller's responsibility)
#[allow(async_fn_in_trait)]
pub trait ImuSensor {
    /// Bring up the sensor
    ///
    /// Called once at startup. Failure is fatal for the node; the caller
    /// surfaces it and does not retry here.
    async fn initialize(&mut self) -> Result<(), ImuError>;

    /// Read instantaneous acceleration (g)
    async fn read_accel(&mut self) -> Result<Vector3<f32>, ImuError>;

    /// Read instantaneous angular rate (deg/s)
    async fn read_gyro(&mut self) -> Result<Vector3<f32>, ImuError>;
}
