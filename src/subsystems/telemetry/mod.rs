//! Telemetry subsystem: periodic orientation publishing

pub mod task;

pub use task::{publish_cycle, quat_path, run_publish_task, PublishConfig};
