//! Edge-triggered interrupt adapter.
//!
//! # Arm sequence
//! 1. Priority and trigger of the switch line at the controller
//! 2. Connect the echo as the line's handler
//! 3. Enable the line at the controller
//! 4. Enable the switch channel's interrupt at the GPIO, then its output
//! 5. Route the CPU's IRQ exception to the controller and unmask it
//!
//! A failure at any step returns before the CPU can take the interrupt.

use core::convert::Infallible;

use common::arch::CurrentIrq;
use common::sync::IrqMutex;
use drivers::hal::gpio::{GpioChannelInterrupts, SignalValue};
use drivers::hal::interrupt::{
    ConfigurableInterruptController, ExceptionGate, HandlerRegistry, IrqNumber, Priority,
    PriorityInterruptController, TriggerMode,
};
use log::{debug, error, info};

use super::IoEchoStrategy;
use crate::error::BringUpError;
use crate::transfer::SharedSwitchLeds;

/// Controller-side configuration of the switch line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InterruptBinding {
    pub irq: IrqNumber,
    pub priority: Priority,
    pub trigger: TriggerMode,
}

pub struct InterruptEcho<C: 'static, G> {
    intc: &'static IrqMutex<C, CurrentIrq>,
    gate: G,
    binding: InterruptBinding,
}

impl<C, G> InterruptEcho<C, G>
where
    C: HandlerRegistry
        + PriorityInterruptController
        + ConfigurableInterruptController
        + Send
        + 'static,
    G: ExceptionGate,
{
    pub fn new(intc: &'static IrqMutex<C, CurrentIrq>, gate: G, binding: InterruptBinding) -> Self {
        Self {
            intc,
            gate,
            binding,
        }
    }

    /// Arm the switch line.
    pub fn arm<D>(&mut self, echo: &'static SharedSwitchLeds<D>) -> Result<(), BringUpError>
    where
        D: GpioChannelInterrupts + Send + 'static,
    {
        let InterruptBinding {
            irq,
            priority,
            trigger,
        } = self.binding;

        {
            let mut intc = self.intc.lock();

            intc.set_priority_trigger(irq, priority, trigger).map_err(|e| {
                error!("IRQ {}: priority/trigger rejected: {:?}", irq, e);
                BringUpError::LineConfig(irq)
            })?;

            intc.connect(irq, echo).map_err(|e| {
                error!("IRQ {}: connect failed: {:?}", irq, e);
                BringUpError::Connect(irq)
            })?;

            if let Err(e) = intc.enable(irq) {
                intc.disconnect(irq);
                error!("IRQ {}: enable failed: {:?}", irq, e);
                return Err(BringUpError::LineConfig(irq));
            }
        }

        echo.with(|echo| {
            let mask = echo.layout().switches.mask();
            let device = echo.device_mut();
            device.enable_interrupt(mask);
            device.global_interrupt_enable();
        });

        self.gate.install(self.intc);
        self.gate.unmask();

        info!(
            "IRQ {} armed (priority {:#04x}, {:?})",
            irq, priority, trigger
        );
        Ok(())
    }

    /// Arm, then mirror once so the LEDs show the switches before the
    /// first edge.
    pub fn start<D>(&mut self, echo: &'static SharedSwitchLeds<D>) -> Result<SignalValue, BringUpError>
    where
        D: GpioChannelInterrupts + Send + 'static,
    {
        self.arm(echo)?;
        let value = echo.mirror();
        debug!("initial switches {:#05b}", value);
        Ok(value)
    }

    /// Undo [`arm`](Self::arm) at the peripheral and the controller.
    ///
    /// The CPU gate stays open for other lines.
    pub fn disarm<D>(&mut self, echo: &SharedSwitchLeds<D>) -> Result<(), BringUpError>
    where
        D: GpioChannelInterrupts,
    {
        let irq = self.binding.irq;

        echo.with(|echo| {
            let mask = echo.layout().switches.mask();
            echo.device_mut().disable_interrupt(mask);
        });

        let mut intc = self.intc.lock();
        let disabled = intc.disable(irq);
        intc.disconnect(irq);
        disabled.map_err(|e| {
            error!("IRQ {}: disable failed: {:?}", irq, e);
            BringUpError::LineConfig(irq)
        })?;

        info!("IRQ {} disarmed", irq);
        Ok(())
    }

    pub fn binding(&self) -> InterruptBinding {
        self.binding
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Park forever; every further LED update comes from the handler.
    pub fn run(mut self) -> ! {
        loop {
            self.gate.wait_for_interrupt();
        }
    }
}

impl<D, C, G> IoEchoStrategy<D> for InterruptEcho<C, G>
where
    D: GpioChannelInterrupts + Send + 'static,
    C: HandlerRegistry
        + PriorityInterruptController
        + ConfigurableInterruptController
        + Send
        + 'static,
    G: ExceptionGate,
{
    const NAME: &'static str = "interrupt";

    fn arm_and_run(mut self, echo: &'static SharedSwitchLeds<D>) -> Result<Infallible, BringUpError> {
        self.start(echo)?;
        self.run()
    }
}
