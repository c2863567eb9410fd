//! Execution models for the switch to LED echo.

pub mod interrupt;
pub mod polling;

use core::convert::Infallible;

use drivers::hal::gpio::GpioChannels;

use crate::error::BringUpError;
use crate::transfer::SharedSwitchLeds;

/// One way of keeping the LEDs in step with the switches.
///
/// Exactly one strategy is installed per build. `arm_and_run` only
/// returns if arming fails; once running, it parks forever.
pub trait IoEchoStrategy<D: GpioChannels> {
    /// Name used in bring-up logs.
    const NAME: &'static str;

    fn arm_and_run(self, echo: &'static SharedSwitchLeds<D>) -> Result<Infallible, BringUpError>;
}
