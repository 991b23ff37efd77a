//! IMU reader: sensor sampling, bias correction and fusion
//!
//! Turns raw sensor vectors into an updated [`ImuSample`] using the remembered
//! gyro bias. Generic over the sensor and the fusion filter so the pipeline
//! can be exercised on the host with mocks.

use super::data::ImuSample;
use super::fusion::FusionFilter;
use crate::devices::traits::{ImuError, ImuSensor};
use nalgebra::Vector3;

const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;

/// Sensor + filter + bias correction
pub struct ImuReader<S, F> {
    sensor: S,
    fusion: F,
    /// Gyro bias in sensor units (deg/s), subtracted before fusion
    bias: Vector3<f32>,
    /// Raw (uncorrected) gyro of the last successful update, for calibration
    raw_gyro: Vector3<f32>,
    sample: ImuSample,
    /// Sample interval handed to the fusion filter (seconds)
    dt: f32,
}

impl<S: ImuSensor, F: FusionFilter> ImuReader<S, F> {
    /// Create a reader for the given acquire rate
    pub fn new(sensor: S, fusion: F, sample_rate_hz: u32) -> Self {
        Self {
            sensor,
            fusion,
            bias: Vector3::zeros(),
            raw_gyro: Vector3::zeros(),
            sample: ImuSample::default(),
            dt: 1.0 / sample_rate_hz.max(1) as f32,
        }
    }

    /// Bring up the sensor
    ///
    /// Failure is fatal at startup; the caller surfaces it without retrying.
    pub async fn initialize(&mut self) -> Result<(), ImuError> {
        self.sensor.initialize().await
    }

    /// Reinitialize the sensor, keeping the installed bias
    ///
    /// Used by the `reset-sensor` command path. The fused sample is left as
    /// it was; the next successful update overwrites it.
    pub async fn reinitialize(&mut self) -> Result<(), ImuError> {
        self.sensor.initialize().await
    }

    /// Replace the stored gyro correction (deg/s)
    ///
    /// Takes effect on the next [`update`](ImuReader::update).
    pub fn set_bias(&mut self, bias: Vector3<f32>) {
        self.bias = bias;
    }

    /// Currently installed gyro correction (deg/s)
    pub fn bias(&self) -> Vector3<f32> {
        self.bias
    }

    /// Raw gyro rate of the last successful update (deg/s, uncorrected)
    pub fn raw_gyro(&self) -> Vector3<f32> {
        self.raw_gyro
    }

    /// Latest fused sample
    pub fn sample(&self) -> &ImuSample {
        &self.sample
    }

    /// Direct access to the sensor collaborator
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Read the sensor and advance the orientation estimate
    ///
    /// Subtracts the stored bias from the gyro rate, feeds the corrected rate
    /// (in radians) and the raw acceleration to the fusion filter, and stamps
    /// the sample with `now_ms`. On a sensor read error the stored sample is
    /// left untouched; there is no partial update.
    pub async fn update(&mut self, now_ms: u32) -> Result<(), ImuError> {
        let accel = self.sensor.read_accel().await?;
        let raw_gyro = self.sensor.read_gyro().await?;
        let gyro = raw_gyro - self.bias;

        let mut orientation = self.sample.orientation;
        self.fusion
            .update(gyro * DEG_TO_RAD, accel, self.dt, &mut orientation);

        self.raw_gyro = raw_gyro;
        self.sample = ImuSample {
            timestamp_ms: now_ms,
            accel,
            gyro,
            orientation,
        };
        Ok(())
    }

    /// Copy out the sample if it is newer than the caller's cursor
    ///
    /// Returns `None` when `last_seen_ms` equals the sample's stamp. Each
    /// consumer keeps its own last-seen value; comparison is plain equality so
    /// timestamp wraparound is harmless.
    pub fn read_if_changed(&self, last_seen_ms: u32) -> Option<ImuSample> {
        if self.sample.timestamp_ms == last_seen_ms {
            None
        } else {
            Some(self.sample)
        }
    }
}
