//! Bring-up sequencer.
//!
//! Opens the devices, sets channel directions once, then hands the
//! configured echo to the selected [`IoEchoStrategy`]. Every failure is
//! logged where it happens and returned as a [`BringUpError`]; nothing
//! is retried.

use core::convert::Infallible;

use drivers::DeviceId;
use drivers::hal::gpio::{DirectionMask, GpioChannels};
use drivers::platform::Platform;
use log::{error, info};

use crate::error::BringUpError;
use crate::strategy::IoEchoStrategy;
use crate::transfer::{ChannelLayout, SharedSwitchLeds, SwitchLeds};

/// Status reported when bring-up fails.
pub const EXIT_FAILURE: i32 = 1;

/// Look up and initialise the GPIO device.
///
/// # Safety
/// Must only be called once per device.
pub unsafe fn open_gpio<P: Platform>(id: DeviceId) -> Result<P::Gpio, BringUpError> {
    unsafe { P::gpio(id) }.map_err(|e| {
        error!("GPIO device {}: {:?}", id, e);
        BringUpError::GpioInit
    })
}

/// Look up and initialise the interrupt controller.
///
/// # Safety
/// Must only be called once, before IRQs are unmasked.
pub unsafe fn open_interrupt_controller<P: Platform>(
    id: DeviceId,
) -> Result<P::Intc, BringUpError> {
    unsafe { P::interrupt_controller(id) }.map_err(|e| {
        error!("interrupt controller {}: {:?}", id, e);
        BringUpError::ControllerInit
    })
}

/// Set the switch channel to input and the LED channel to output.
///
/// Nothing is read or written. On failure the device is dropped, so no
/// adapter can reach it.
pub fn configure<D: GpioChannels>(
    mut device: D,
    layout: ChannelLayout,
) -> Result<SwitchLeds<D>, BringUpError> {
    for (channel, direction) in [
        (layout.switches, DirectionMask::SWITCHES),
        (layout.leds, DirectionMask::LEDS),
    ] {
        device.set_direction(channel, direction).map_err(|e| {
            error!("channel {} direction: {:?}", channel.index(), e);
            BringUpError::Direction(channel)
        })?;
    }

    info!(
        "switches on channel {}, LEDs on channel {}",
        layout.switches.index(),
        layout.leds.index()
    );
    Ok(SwitchLeds::new(device, layout))
}

/// Install `strategy` and run it. Only returns on failure.
pub fn run<D, S>(echo: &'static SharedSwitchLeds<D>, strategy: S) -> Result<Infallible, BringUpError>
where
    D: GpioChannels,
    S: IoEchoStrategy<D>,
{
    info!("installing {} adapter", S::NAME);
    strategy.arm_and_run(echo)
}

/// Status to report for the result of [`run`].
pub fn exit_status(result: Result<Infallible, BringUpError>) -> i32 {
    match result {
        Ok(never) => match never {},
        Err(e) => {
            error!("bring-up failed: {}", e);
            EXIT_FAILURE
        }
    }
}
