//! Gyro bias estimation window
//!
//! Fixed-capacity running-average estimator fed while the device is held
//! stationary. Keeps per-axis sums rather than a sample buffer, so memory use
//! is constant regardless of the window length.

use nalgebra::Vector3;

/// Default calibration window length (samples)
///
/// At the 200 Hz acquire rate this is one second of stationary data.
pub const DEFAULT_WINDOW: usize = 200;

/// Running-average gyro bias accumulator
///
/// Created once and reused across every calibration cycle. Once the window is
/// full the accumulator is "complete": further pushes are discarded until
/// [`reset`](BiasAccumulator::reset).
#[derive(Debug, Clone)]
pub struct BiasAccumulator {
    capacity: usize,
    count: usize,
    sum: Vector3<f32>,
}

impl BiasAccumulator {
    /// Create an accumulator with the given window length
    ///
    /// A zero capacity is rounded up to one sample.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            count: 0,
            sum: Vector3::zeros(),
        }
    }

    /// Window length in samples
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples accumulated so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// True once the window is full
    pub fn is_complete(&self) -> bool {
        self.count == self.capacity
    }

    /// Feed one angular-rate sample
    ///
    /// Returns `true` while more samples are needed and `false` exactly on
    /// the call that fills the window - the caller's cue to read
    /// [`average`](BiasAccumulator::average). Pushes after completion are
    /// discarded and return `true` again; completion is reported once per
    /// window.
    pub fn push(&mut self, rate: Vector3<f32>) -> bool {
        if self.is_complete() {
            return true;
        }
        self.sum += rate;
        self.count += 1;
        !self.is_complete()
    }

    /// Per-axis mean of the accumulated window
    ///
    /// `None` until the window is complete; a partial average is never
    /// returned.
    pub fn average(&self) -> Option<Vector3<f32>> {
        if self.is_complete() {
            Some(self.sum / self.capacity as f32)
        } else {
            None
        }
    }

    /// Clear sums and count, ready for a new window
    pub fn reset(&mut self) {
        self.count = 0;
        self.sum = Vector3::zeros();
    }
}
