//! Persistent settings store
//!
//! Contract the node needs from the persistence collaborator (NVS,
//! flash-backed parameter block, a file on the host - the node does not
//! care). Three values survive restarts: the gyro bias, the node identity
//! and the telemetry destination.
//!
//! Reads never fail: a missing value yields its documented default (zero
//! bias, [`DEFAULT_IDENTITY`], [`DEFAULT_DESTINATION`]). Writes can fail;
//! callers log and carry on, persistence is best-effort.
//!
//! [`DEFAULT_IDENTITY`]: crate::parameters::node::DEFAULT_IDENTITY
//! [`DEFAULT_DESTINATION`]: crate::parameters::node::DEFAULT_DESTINATION

use super::node::{DESTINATION_MAX, IDENTITY_MAX};
use heapless::String;
use nalgebra::Vector3;

/// Settings write error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Backing medium rejected the write
    WriteFailed,
    /// Value does not fit the stored representation
    InvalidValue,
}

/// Persistent key/value settings used by the node
pub trait SettingsStore {
    /// Last persisted gyro bias (deg/s); zero vector when never calibrated
    fn read_gyro_bias(&mut self) -> Vector3<f32>;

    /// Persist a freshly calibrated gyro bias
    fn write_gyro_bias(&mut self, bias: Vector3<f32>) -> Result<(), StoreError>;

    /// Node identity; `DEFAULT_IDENTITY` when never set
    fn read_identity(&mut self) -> String<IDENTITY_MAX>;

    /// Persist the node identity
    fn write_identity(&mut self, identity: &str) -> Result<(), StoreError>;

    /// Telemetry destination address; `DEFAULT_DESTINATION` when never set
    fn read_destination(&mut self) -> String<DESTINATION_MAX>;

    /// Persist the telemetry destination
    fn write_destination(&mut self, destination: &str) -> Result<(), StoreError>;
}
