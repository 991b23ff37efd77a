//! Mock settings store

use crate::parameters::node::{
    DEFAULT_DESTINATION, DEFAULT_IDENTITY, DESTINATION_MAX, IDENTITY_MAX,
};
use crate::parameters::store::{SettingsStore, StoreError};
use heapless::String;
use nalgebra::Vector3;

/// In-memory settings store with write counters
///
/// Reads fall back to the documented defaults while nothing is stored,
/// exactly like a fresh NVS namespace.
#[derive(Debug, Default)]
pub struct MockStore {
    gyro_bias: Option<Vector3<f32>>,
    identity: Option<String<IDENTITY_MAX>>,
    destination: Option<String<DESTINATION_MAX>>,
    fail_writes: bool,

    /// Successful `write_gyro_bias` calls
    pub gyro_bias_writes: u32,
    /// Successful `write_identity` calls
    pub identity_writes: u32,
    /// Successful `write_destination` calls
    pub destination_writes: u32,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a persisted bias (as if a previous run calibrated)
    pub fn preload_gyro_bias(&mut self, bias: Vector3<f32>) {
        self.gyro_bias = Some(bias);
    }

    /// Preload a persisted identity
    pub fn preload_identity(&mut self, identity: &str) {
        self.identity = String::try_from(identity).ok();
    }

    /// Preload a persisted destination
    pub fn preload_destination(&mut self, destination: &str) {
        self.destination = String::try_from(destination).ok();
    }

    /// Make every write fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Stored bias, `None` if never written
    pub fn stored_gyro_bias(&self) -> Option<Vector3<f32>> {
        self.gyro_bias
    }

    /// Stored identity, `None` if never written
    pub fn stored_identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Stored destination, `None` if never written
    pub fn stored_destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }
}

impl SettingsStore for MockStore {
    fn read_gyro_bias(&mut self) -> Vector3<f32> {
        self.gyro_bias.unwrap_or_else(Vector3::zeros)
    }

    fn write_gyro_bias(&mut self, bias: Vector3<f32>) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed);
        }
        self.gyro_bias = Some(bias);
        self.gyro_bias_writes += 1;
        Ok(())
    }

    fn read_identity(&mut self) -> String<IDENTITY_MAX> {
        self.identity.clone().unwrap_or_else(|| {
            String::try_from(DEFAULT_IDENTITY).unwrap_or_default()
        })
    }

    fn write_identity(&mut self, identity: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed);
        }
        self.identity = Some(String::try_from(identity).map_err(|_| StoreError::InvalidValue)?);
        self.identity_writes += 1;
        Ok(())
    }

    fn read_destination(&mut self) -> String<DESTINATION_MAX> {
        self.destination.clone().unwrap_or_else(|| {
            String::try_from(DEFAULT_DESTINATION).unwrap_or_default()
        })
    }

    fn write_destination(&mut self, destination: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed);
        }
        self.destination =
            Some(String::try_from(destination).map_err(|_| StoreError::InvalidValue)?);
        self.destination_writes += 1;
        Ok(())
    }
}
