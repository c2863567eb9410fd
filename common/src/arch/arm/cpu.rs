//! Single-instruction CPU helpers.

/// Clear the CPSR I bit, letting IRQ exceptions reach the core.
#[inline(always)]
pub fn enable_irq() {
    unsafe { core::arch::asm!("cpsie i", options(nostack)) }
}

/// Set the CPSR I bit.
#[inline(always)]
pub fn disable_irq() {
    unsafe { core::arch::asm!("cpsid i", options(nostack)) }
}

/// Wait for interrupt (low-power idle).
///
/// Returns after any interrupt becomes pending, whether or not it is
/// taken.
#[inline(always)]
pub fn wait_for_interrupt() {
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack, preserves_flags));
    }
}

/// Data synchronization barrier.
#[inline(always)]
pub fn dsb() {
    unsafe {
        core::arch::asm!("dsb", options(nostack, preserves_flags));
    }
}
