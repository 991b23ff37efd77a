//! Control channel trait
//!
//! Delivers named remote commands into the ingest task. The collaborator
//! owns the wire protocol and queuing; the node only drains ready messages.

use heapless::String;

/// Maximum command name length
pub const NAME_MAX: usize = 32;

/// Maximum command payload length
pub const ARG_MAX: usize = 48;

/// One queued remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    /// Command name (e.g. `set-destination`)
    pub name: String<NAME_MAX>,

    /// Optional string payload
    pub arg: Option<String<ARG_MAX>>,
}

impl ControlMessage {
    /// Build a message, truncating nothing: oversized name or payload yields
    /// `None` (the command would be malformed anyway).
    pub fn new(name: &str, arg: Option<&str>) -> Option<Self> {
        let name = String::try_from(name).ok()?;
        let arg = match arg {
            Some(a) => Some(String::try_from(a).ok()?),
            None => None,
        };
        Some(Self { name, arg })
    }
}

/// Queued command source drained by the ingest task
pub trait ControlChannel {
    /// Pop the next queued command, if any
    ///
    /// Non-blocking; the ingest task drains the queue every tick so a burst
    /// of commands cannot build an unbounded backlog.
    fn try_next(&mut self) -> Option<ControlMessage>;
}
