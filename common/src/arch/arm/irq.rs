use crate::sync::irq::IrqControl;

/// CPSR bit that masks the IRQ exception when set.
const CPSR_I: u32 = 1 << 7;

// The asm blocks that touch the I bit are compiler barriers (no `nomem`):
// accesses inside a critical section must stay between mask and unmask.
#[inline(always)]
fn mask_and_read_cpsr() -> u32 {
    let cpsr: u32;
    unsafe {
        core::arch::asm!(
            "mrs {cpsr}, cpsr",
            "cpsid i",
            cpsr = out(reg) cpsr,
            options(nostack)
        );
    }
    cpsr
}

/// [`IrqControl`] over the CPSR I bit.
///
/// The saved state is the I bit as it was on entry, so only the outermost
/// section of a nest unmasks again.
#[derive(Debug)]
pub struct ArmIrq;

impl IrqControl for ArmIrq {
    type State = u32;

    #[inline(always)]
    fn disable() -> u32 {
        mask_and_read_cpsr() & CPSR_I
    }

    #[inline(always)]
    fn restore(saved_i: u32) {
        if saved_i == 0 {
            super::cpu::enable_irq();
        }
    }
}
