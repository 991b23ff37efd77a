//! Node subsystems

pub mod ahrs;
pub mod indicator;
pub mod telemetry;
