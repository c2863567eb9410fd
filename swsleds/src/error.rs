use core::fmt;

use drivers::hal::gpio::Channel;
use drivers::hal::interrupt::IrqNumber;

/// Fatal bring-up failures.
///
/// Anything that goes wrong before the adapter's main loop starts ends
/// up here. There are no retries: every variant is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BringUpError {
    /// The GPIO device could not be found or initialised.
    GpioInit,
    /// Direction configuration of a channel was rejected.
    Direction(Channel),
    /// The interrupt controller could not be found or initialised.
    ControllerInit,
    /// Priority, trigger or enable of a line was rejected.
    LineConfig(IrqNumber),
    /// The handler could not be registered for a line.
    Connect(IrqNumber),
}

impl fmt::Display for BringUpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BringUpError::GpioInit => write!(f, "GPIO initialisation failed"),
            BringUpError::Direction(channel) => {
                write!(f, "direction of channel {} rejected", channel.index())
            }
            BringUpError::ControllerInit => {
                write!(f, "interrupt controller initialisation failed")
            }
            BringUpError::LineConfig(irq) => write!(f, "configuring IRQ {} failed", irq),
            BringUpError::Connect(irq) => write!(f, "connecting handler to IRQ {} failed", irq),
        }
    }
}

impl core::error::Error for BringUpError {}
