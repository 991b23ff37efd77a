//! Telemetry transport trait
//!
//! Fire-and-forget delivery of one quaternion datagram to a peer. No
//! delivery guarantee and no retry: a failed send is dropped, the next
//! publish cycle carries fresher data anyway.

/// Transport send error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Destination address could not be parsed or resolved
    BadDestination,
    /// Underlying socket/link send failed
    SendFailed,
    /// Transport not ready (link down, not bound yet)
    NotReady,
}

/// Outgoing telemetry link
#[allow(async_fn_in_trait)]
pub trait TelemetryTransport {
    /// Send one quaternion payload `[w, x, y, z]` to `destination`
    /// (`host:port`) under the given address path (e.g. `/stick-07/quat`).
    async fn send(
        &mut self,
        destination: &str,
        path: &str,
        payload: [f32; 4],
    ) -> Result<(), TransportError>;
}
