//! Device-independent sensor traits

pub mod imu;

pub use imu::{ImuError, ImuSensor};
