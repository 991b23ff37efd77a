//! Indicator subsystem: command-acknowledge pulse

pub mod task;

pub use task::{run_indicator_task, PULSE_WIDTH};
