//! Mock system control

use crate::platform::traits::SystemControl;

/// Mock restart collaborator counting requests
#[derive(Debug, Default)]
pub struct MockSystem {
    pub restarts: u32,
}

impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SystemControl for MockSystem {
    fn restart(&mut self) {
        self.restarts += 1;
    }
}
