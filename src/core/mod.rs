//! Core systems shared across subsystems

pub mod logging;
