//! Indicator output trait
//!
//! A single boolean output the node pulses when a remote command is handled
//! (typically an LED or a GPIO line, active-low on the original hardware).

/// Boolean indicator output
pub trait Indicator {
    /// Drive the output high (idle level)
    fn set_high(&mut self);

    /// Drive the output low (active level)
    fn set_low(&mut self);
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }
}
