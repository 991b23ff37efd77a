//! Device traits using the platform abstraction

pub mod traits;
