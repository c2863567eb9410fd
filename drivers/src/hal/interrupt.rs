//! Interrupt Controller Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for interrupt
//! management: line configuration, handler registration, and the
//! acknowledge / handle / end-of-interrupt dispatch sequence.

use common::sync::IrqMutex;
use common::sync::irq::IrqControl;

/// Interrupt number type.
pub type IrqNumber = u32;

/// Interrupt priority level.
///
/// Lower values indicate higher priority, as on the ARM GIC.
pub type Priority = u8;

/// Interrupt controller trait.
///
/// This trait represents the system's interrupt controller.
pub trait InterruptController {
    /// Error type for interrupt controller operations.
    type Error: core::fmt::Debug;

    /// Enable (unmask) an interrupt line.
    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Disable (mask) an interrupt line.
    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Check if an interrupt is currently pending.
    fn is_pending(&self, irq: IrqNumber) -> Result<bool, Self::Error>;

    /// Acknowledge the highest-priority pending interrupt.
    ///
    /// The returned line becomes active and will not be signalled again
    /// until [`end_of_interrupt`](Self::end_of_interrupt) is called for it.
    /// Returns `None` if nothing is pending (or the read was spurious).
    fn acknowledge(&mut self) -> Option<IrqNumber>;

    /// Signal completion of an acknowledged interrupt.
    fn end_of_interrupt(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        let _ = irq;
        Ok(())
    }
}

/// Extension trait for interrupt controllers with priority support.
pub trait PriorityInterruptController: InterruptController {
    /// Set the priority of an interrupt line.
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), Self::Error>;

    /// Get the priority of an interrupt line.
    fn get_priority(&self, irq: IrqNumber) -> Result<Priority, Self::Error>;
}

/// Interrupt trigger mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TriggerMode {
    /// Interrupt triggers on a rising edge.
    RisingEdge,
    /// Interrupt triggers on a falling edge.
    FallingEdge,
    /// Interrupt is active when the signal is high.
    LevelHigh,
    /// Interrupt is active when the signal is low.
    LevelLow,
}

/// Extension trait for interrupt controllers with trigger mode configuration.
pub trait ConfigurableInterruptController: InterruptController {
    /// Configure an interrupt's trigger mode.
    fn configure_trigger(&mut self, irq: IrqNumber, mode: TriggerMode) -> Result<(), Self::Error>;

    /// Set priority and trigger of one line in a single call.
    ///
    /// Stops at the first rejected setting.
    fn set_priority_trigger(
        &mut self,
        irq: IrqNumber,
        priority: Priority,
        mode: TriggerMode,
    ) -> Result<(), Self::Error>
    where
        Self: PriorityInterruptController,
    {
        self.set_priority(irq, priority)?;
        self.configure_trigger(irq, mode)
    }
}

/// Routine invoked from IRQ context when its line fires.
///
/// Implementations run with the line active and IRQs masked. They must
/// not block or suspend, and must clear the peripheral's interrupt
/// condition before returning so the line can trigger again.
pub trait IrqHandler: Sync {
    fn handle(&self, irq: IrqNumber);
}

/// Interrupt controllers that own a handler table.
pub trait HandlerRegistry: InterruptController {
    /// Register `handler` for `irq`.
    fn connect(&mut self, irq: IrqNumber, handler: &'static dyn IrqHandler)
    -> Result<(), Self::Error>;

    /// Remove whatever handler is registered for `irq`.
    fn disconnect(&mut self, irq: IrqNumber);

    /// Handler currently registered for `irq`.
    fn handler(&self, irq: IrqNumber) -> Option<&'static dyn IrqHandler>;
}

/// Dispatch one pending interrupt to its registered handler.
///
/// # Process
/// 1. Acknowledge the next pending line (the line becomes active)
/// 2. Call its handler exactly once
/// 3. Signal end-of-interrupt so the line can be signalled again
///
/// Returns the line that was serviced, or `None` if nothing was pending.
pub fn dispatch_pending<C>(intc: &mut C) -> Option<IrqNumber>
where
    C: HandlerRegistry + ?Sized,
{
    let irq = intc.acknowledge()?;

    match intc.handler(irq) {
        Some(handler) => handler.handle(irq),
        None => log::warn!("Unhandled IRQ: {}", irq),
    }

    if let Err(e) = intc.end_of_interrupt(irq) {
        log::warn!("end of interrupt failed for IRQ {}: {:?}", irq, e);
    }

    Some(irq)
}

/// Something the CPU exception vector can drain interrupts from.
pub trait IrqSource: Sync {
    /// Service one pending interrupt, returning its line.
    fn dispatch(&self) -> Option<IrqNumber>;

    /// Service interrupts until none are pending. Returns how many ran.
    fn dispatch_all(&self) -> usize {
        let mut serviced = 0;
        while self.dispatch().is_some() {
            serviced += 1;
        }
        serviced
    }
}

impl<C, I> IrqSource for IrqMutex<C, I>
where
    C: HandlerRegistry + Send,
    I: IrqControl,
{
    fn dispatch(&self) -> Option<IrqNumber> {
        dispatch_pending(&mut *self.lock())
    }
}

/// CPU-level half of the interrupt path.
///
/// The controller decides which line is signalled; the gate decides
/// whether the core takes the IRQ exception at all, and where the
/// exception vector sends it.
pub trait ExceptionGate {
    /// Route IRQ exceptions to `source`.
    fn install(&mut self, source: &'static dyn IrqSource);

    /// Let IRQ exceptions reach the core.
    fn unmask(&mut self);

    /// Stop IRQ exceptions reaching the core.
    fn mask(&mut self);

    /// Idle until an interrupt arrives.
    fn wait_for_interrupt(&mut self);
}
