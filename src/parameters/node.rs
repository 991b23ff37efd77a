//! Node identity and telemetry destination
//!
//! Small shared configuration read by the publish task every cycle and
//! written only by the ingest task. Consistency requirement: a reader must
//! never observe a torn identity/destination pair, so the value is replaced
//! as a unit under a blocking mutex (the critical section is a handful of
//! copies, far too short to matter to the publish cadence).

use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

/// Maximum node identity length
pub const IDENTITY_MAX: usize = 32;

/// Maximum destination address length (`host:port` form)
pub const DESTINATION_MAX: usize = 48;

/// Identity used when none has been persisted
pub const DEFAULT_IDENTITY: &str = "default";

/// Destination used when none has been persisted
pub const DEFAULT_DESTINATION: &str = "10.0.0.116:33333";

/// Identity + destination pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Textual node identifier, first segment of the telemetry path
    pub identity: String<IDENTITY_MAX>,

    /// Network destination for telemetry (`host:port`)
    pub destination: String<DESTINATION_MAX>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut identity = String::new();
        let mut destination = String::new();
        // Defaults fit their bounds by construction.
        let _ = identity.push_str(DEFAULT_IDENTITY);
        let _ = destination.push_str(DEFAULT_DESTINATION);
        Self {
            identity,
            destination,
        }
    }
}

/// Shared, torn-read-free node configuration
pub struct SharedNodeConfig {
    inner: Mutex<CriticalSectionRawMutex, RefCell<NodeConfig>>,
}

impl SharedNodeConfig {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(config)),
        }
    }

    /// Copy the current configuration out
    pub fn snapshot(&self) -> NodeConfig {
        self.inner.lock(|cell| cell.borrow().clone())
    }

    /// Replace the whole configuration
    pub fn replace(&self, config: NodeConfig) {
        self.inner.lock(|cell| *cell.borrow_mut() = config);
    }

    /// Replace only the identity
    ///
    /// Returns `false` (config unchanged) when the value exceeds
    /// [`IDENTITY_MAX`].
    pub fn set_identity(&self, identity: &str) -> bool {
        let Ok(identity) = String::try_from(identity) else {
            return false;
        };
        self.inner.lock(|cell| {
            cell.borrow_mut().identity = identity;
        });
        true
    }

    /// Replace only the destination
    ///
    /// Returns `false` (config unchanged) when the value exceeds
    /// [`DESTINATION_MAX`].
    pub fn set_destination(&self, destination: &str) -> bool {
        let Ok(destination) = String::try_from(destination) else {
            return false;
        };
        self.inner.lock(|cell| {
            cell.borrow_mut().destination = destination;
        });
        true
    }
}

impl Default for SharedNodeConfig {
    fn default() -> Self {
        Self::new(NodeConfig::default())
    }
}
