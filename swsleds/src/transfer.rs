//! Switch to LED transfer.
//!
//! [`SwitchLeds`] owns the GPIO device once its directions are set;
//! [`SharedSwitchLeds`] puts it behind an [`IrqMutex`] so the same device
//! can be reached from thread context and from the interrupt handler.

use common::arch::CurrentIrq;
use common::sync::IrqMutex;
use drivers::hal::gpio::{Channel, GpioChannelInterrupts, GpioChannels, SignalValue};
use drivers::hal::interrupt::{IrqHandler, IrqNumber};
use log::trace;

/// Which channel of the device carries which bank.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelLayout {
    pub switches: Channel,
    pub leds: Channel,
}

/// A GPIO device with configured switch and LED channels.
///
/// Only [`bringup::configure`](crate::bringup::configure) builds one, so
/// holding a `SwitchLeds` means directions were set before any read or
/// write.
#[derive(Debug)]
pub struct SwitchLeds<D> {
    device: D,
    layout: ChannelLayout,
}

impl<D: GpioChannels> SwitchLeds<D> {
    pub(crate) fn new(device: D, layout: ChannelLayout) -> Self {
        Self { device, layout }
    }

    /// Copy the switch pattern onto the LEDs, unchanged.
    ///
    /// Returns the pattern written.
    pub fn mirror(&mut self) -> SignalValue {
        let value = self.device.read(self.layout.switches);
        self.device.write(self.layout.leds, value);
        value
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

/// [`SwitchLeds`] shared between thread and interrupt context.
pub struct SharedSwitchLeds<D> {
    inner: IrqMutex<SwitchLeds<D>, CurrentIrq>,
}

impl<D: GpioChannels> SharedSwitchLeds<D> {
    pub const fn new(echo: SwitchLeds<D>) -> Self {
        Self {
            inner: IrqMutex::new(echo),
        }
    }

    pub fn mirror(&self) -> SignalValue {
        self.inner.lock().mirror()
    }

    /// Run `f` with the device locked and IRQs masked.
    pub fn with<R>(&self, f: impl FnOnce(&mut SwitchLeds<D>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

/// The interrupt half of the echo: mirror, then clear the switch
/// channel's latched condition so the next edge can fire.
///
/// The clear comes last. Until then the controller keeps the line active
/// and cannot re-enter the handler.
impl<D> IrqHandler for SharedSwitchLeds<D>
where
    D: GpioChannelInterrupts + Send,
{
    fn handle(&self, irq: IrqNumber) {
        let value = self.with(|echo| {
            let value = echo.mirror();
            let switches = echo.layout().switches;
            echo.device_mut().clear_interrupt(switches.mask());
            value
        });
        trace!("IRQ {}: switches {:#05b}", irq, value);
    }
}
