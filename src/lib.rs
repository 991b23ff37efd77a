#![cfg_attr(not(test), no_std)]

//! quatcast - soft real-time attitude streaming node
//!
//! Samples an inertial sensor, fuses the readings into an orientation
//! quaternion, calibrates gyro bias on command, and republishes the estimate
//! to a network peer while accepting remote control commands.
//!
//! Hardware, transport, storage and the control channel are collaborator
//! traits; the node core is the concurrent pipeline of four periodic tasks
//! sharing one lock-guarded tracker state.

// Platform abstraction layer (indicator output, system restart, mocks)
pub mod platform;

// Device traits (IMU sensor contract)
pub mod devices;

// Core systems (logging)
pub mod core;

// Communication (telemetry transport, control channel, command dispatch)
pub mod communication;

// Persistent settings and shared node configuration
pub mod parameters;

// Subsystems (AHRS pipeline, telemetry publisher, indicator)
pub mod subsystems;

// Node wiring: startup and the joined task set
pub mod node;
