//! Indicator task: pulse an output when a command is handled
//!
//! Event-driven, no fixed period: blocks on a coalescing signal raised by
//! the ingest task and answers each wake with a single low-then-high edge
//! pulse. Multiple raises before the waiter wakes collapse to one pulse;
//! callers get "at least one pulse per burst", never an exact count.

use crate::platform::traits::Indicator;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

/// Width of the low phase of the acknowledge pulse
pub const PULSE_WIDTH: Duration = Duration::from_millis(10);

/// Indicator task loop
pub async fn run_indicator_task<I: Indicator>(
    notify: &Signal<CriticalSectionRawMutex, ()>,
    mut indicator: I,
) {
    loop {
        notify.wait().await;
        indicator.set_low();
        Timer::after(PULSE_WIDTH).await;
        indicator.set_high();
    }
}
