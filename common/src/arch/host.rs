//! Host stand-ins for the ARM primitives.
//!
//! There is no interrupt to mask on the host: tests drive "interrupts" by
//! calling dispatch code directly on the test thread.

use crate::sync::irq::IrqControl;

/// No-op interrupt control.
#[derive(Debug)]
pub struct HostIrq;

impl IrqControl for HostIrq {
    type State = ();

    #[inline(always)]
    fn disable() -> Self::State {}

    #[inline(always)]
    fn restore(_state: Self::State) {}
}

#[inline(always)]
pub fn enable_irq() {}

#[inline(always)]
pub fn disable_irq() {}

#[inline(always)]
pub fn wait_for_interrupt() {
    core::hint::spin_loop();
}

#[inline(always)]
pub fn dsb() {
    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
}
