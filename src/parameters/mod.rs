//! Persistent settings and shared node configuration

pub mod node;
pub mod store;

pub use node::{NodeConfig, SharedNodeConfig, DESTINATION_MAX, IDENTITY_MAX};
pub use store::{SettingsStore, StoreError};
