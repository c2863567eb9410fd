//! IRQ exception entry and the CPU-side interrupt gate.

use common::arch::{CurrentIrq, disable_irq, dsb, enable_irq, wait_for_interrupt};
use common::sync::irq::IrqControl;
use drivers::hal::interrupt::{ExceptionGate, IrqSource};
use log::warn;
use spin::Once;

/// Where the IRQ vector sends interrupts. Set once, before IRQs are
/// unmasked.
static IRQ_ROUTE: Once<&'static dyn IrqSource> = Once::new();

/// Called from the IRQ vector in IRQ mode with IRQs masked.
#[unsafe(no_mangle)]
pub extern "C" fn irq_entry_rust() {
    match IRQ_ROUTE.get() {
        Some(source) => {
            if source.dispatch_all() == 0 {
                warn!("spurious IRQ");
            }
        }
        None => warn!("IRQ taken with no route installed"),
    }
}

/// [`ExceptionGate`] over the CPSR I bit and the global IRQ route.
pub struct ArmExceptionGate {
    _private: (),
}

impl ArmExceptionGate {
    /// # Safety
    /// Only one gate may exist.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl ExceptionGate for ArmExceptionGate {
    fn install(&mut self, source: &'static dyn IrqSource) {
        if IRQ_ROUTE.is_completed() {
            warn!("IRQ route already installed");
            return;
        }
        CurrentIrq::masked(|| {
            IRQ_ROUTE.call_once(|| source);
            dsb();
        });
    }

    fn unmask(&mut self) {
        enable_irq();
    }

    fn mask(&mut self) {
        disable_irq();
    }

    fn wait_for_interrupt(&mut self) {
        wait_for_interrupt();
    }
}
