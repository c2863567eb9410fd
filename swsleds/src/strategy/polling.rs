//! Periodic-task adapter.

use core::convert::Infallible;

use drivers::hal::gpio::{GpioChannels, SignalValue};
use drivers::hal::timer::{TaskDelay, Ticks};
use log::{debug, info};

use super::IoEchoStrategy;
use crate::error::BringUpError;
use crate::transfer::SharedSwitchLeds;

/// Mirrors, then suspends for `period` ticks, forever.
///
/// The delay is the only suspension point, so consecutive LED updates are
/// at least `period` apart. They may be further apart if the delay
/// returns late.
pub struct PollingEcho<T> {
    delay: T,
    period: Ticks,
    last: Option<SignalValue>,
}

impl<T: TaskDelay> PollingEcho<T> {
    pub const fn new(delay: T, period: Ticks) -> Self {
        Self {
            delay,
            period,
            last: None,
        }
    }

    /// One RUNNING to BLOCKED to RUNNING cycle.
    pub fn step<D: GpioChannels>(&mut self, echo: &SharedSwitchLeds<D>) -> SignalValue {
        let value = echo.mirror();
        if self.last != Some(value) {
            debug!("switches {:#05b}", value);
            self.last = Some(value);
        }
        self.delay.delay_ticks(self.period);
        value
    }

    pub fn period(&self) -> Ticks {
        self.period
    }

    pub fn delay(&self) -> &T {
        &self.delay
    }
}

impl<D, T> IoEchoStrategy<D> for PollingEcho<T>
where
    D: GpioChannels,
    T: TaskDelay,
{
    const NAME: &'static str = "polling";

    fn arm_and_run(mut self, echo: &'static SharedSwitchLeds<D>) -> Result<Infallible, BringUpError> {
        info!("mirroring every {} ticks", self.period);
        loop {
            self.step(echo);
        }
    }
}
