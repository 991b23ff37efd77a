//! Mock collaborators for host testing
//!
//! In-memory, recording implementations of every collaborator trait the node
//! consumes. Kept heapless so they build under the same no_std constraints
//! as the rest of the crate (the `mock` feature exposes them to integration
//! tests and SITL harnesses).

pub mod control;
pub mod imu;
pub mod indicator;
pub mod store;
pub mod system;
pub mod transport;

pub use control::MockControlChannel;
pub use imu::MockImu;
pub use indicator::MockIndicator;
pub use store::MockStore;
pub use system::MockSystem;
pub use transport::{MockTransport, SentPacket};
