//! Mock control channel

use crate::communication::control::{ControlChannel, ControlMessage};
use heapless::Deque;

/// Mock control channel backed by a bounded queue
#[derive(Debug, Default)]
pub struct MockControlChannel {
    queue: Deque<ControlMessage, 16>,
}

impl MockControlChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for the next ingest tick
    ///
    /// Panics when the queue is full; tests queue a handful of messages.
    pub fn queue(&mut self, msg: ControlMessage) {
        self.queue
            .push_back(msg)
            .expect("mock control queue overflow");
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl ControlChannel for MockControlChannel {
    fn try_next(&mut self) -> Option<ControlMessage> {
        self.queue.pop_front()
    }
}
