//! Platform abstraction layer
//!
//! Collaborator traits the node core needs from the surrounding system
//! (indicator output, restart) and mock implementations of every collaborator
//! for host testing.

pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use traits::{Indicator, SystemControl};
