//! Mock IMU sensor

use crate::devices::traits::{ImuError, ImuSensor};
use nalgebra::Vector3;

/// Mock IMU returning programmable constant readings
///
/// Supports failure injection for both bring-up and reads, and counts
/// initializations so reset paths can be asserted on.
#[derive(Debug, Default)]
pub struct MockImu {
    accel: Vector3<f32>,
    gyro: Vector3<f32>,
    fail_init: bool,
    fail_reads: bool,
    init_count: u32,
}

impl MockImu {
    pub fn new() -> Self {
        Self {
            // Flat and stationary: gravity straight down the z axis.
            accel: Vector3::new(0.0, 0.0, 1.0),
            ..Default::default()
        }
    }

    /// Set the acceleration every `read_accel` returns (g)
    pub fn set_accel(&mut self, accel: Vector3<f32>) {
        self.accel = accel;
    }

    /// Set the angular rate every `read_gyro` returns (deg/s)
    pub fn set_gyro(&mut self, gyro: Vector3<f32>) {
        self.gyro = gyro;
    }

    /// Make `initialize` fail
    pub fn fail_init(&mut self, fail: bool) {
        self.fail_init = fail;
    }

    /// Make both read methods fail with `BusError`
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Number of successful `initialize` calls
    pub fn init_count(&self) -> u32 {
        self.init_count
    }
}

impl ImuSensor for MockImu {
    async fn initialize(&mut self) -> Result<(), ImuError> {
        if self.fail_init {
            return Err(ImuError::InitializationFailed);
        }
        self.init_count += 1;
        Ok(())
    }

    async fn read_accel(&mut self) -> Result<Vector3<f32>, ImuError> {
        if self.fail_reads {
            return Err(ImuError::BusError);
        }
        Ok(self.accel)
    }

    async fn read_gyro(&mut self) -> Result<Vector3<f32>, ImuError> {
        if self.fail_reads {
            return Err(ImuError::BusError);
        }
        Ok(self.gyro)
    }
}
