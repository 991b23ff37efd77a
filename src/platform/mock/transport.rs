//! Mock telemetry transport

use crate::communication::transport::{TelemetryTransport, TransportError};
use heapless::{String, Vec};

/// One recorded send
#[derive(Debug, Clone, PartialEq)]
pub struct SentPacket {
    pub destination: String<64>,
    pub path: String<64>,
    pub payload: [f32; 4],
}

/// Mock transport recording every send
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Every successful send, in order
    pub sent: Vec<SentPacket, 64>,
    fail_sends: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail
    pub fn fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }
}

impl TelemetryTransport for MockTransport {
    async fn send(
        &mut self,
        destination: &str,
        path: &str,
        payload: [f32; 4],
    ) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::SendFailed);
        }
        let packet = SentPacket {
            destination: String::try_from(destination).map_err(|_| TransportError::BadDestination)?,
            path: String::try_from(path).map_err(|_| TransportError::BadDestination)?,
            payload,
        };
        // A full recording buffer just drops the oldest view of history.
        if self.sent.is_full() {
            self.sent.remove(0);
        }
        let _ = self.sent.push(packet);
        Ok(())
    }
}
