//! Mock indicator output

use crate::platform::traits::Indicator;
use heapless::Vec;

/// Mock indicator recording every level transition
///
/// `false` entries are `set_low` calls, `true` entries are `set_high`.
#[derive(Debug, Default)]
pub struct MockIndicator {
    pub transitions: Vec<bool, 32>,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for MockIndicator {
    fn set_high(&mut self) {
        let _ = self.transitions.push(true);
    }

    fn set_low(&mut self) {
        let _ = self.transitions.push(false);
    }
}
