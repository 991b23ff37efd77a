//! Communication: telemetry transport, control channel and command dispatch

pub mod commands;
pub mod control;
pub mod task;
pub mod transport;

pub use commands::{Command, CommandContext};
pub use control::{ControlChannel, ControlMessage};
pub use task::{ingest_cycle, run_ingest_task, IngestConfig};
pub use transport::{TelemetryTransport, TransportError};
