//! Vector table, reset entry and exit.
//!
//! The FSBL hands over in SVC mode with caches and MMU as it configured
//! them. `_start` installs the vector table, gives IRQ and SVC mode their
//! own stacks, clears `.bss` and calls `swsleds_main`. A returned status
//! goes to [`_exit`].

use core::sync::atomic::{AtomicI32, Ordering};

use common::arch::{disable_irq, wait_for_interrupt};

core::arch::global_asm!(
    r#"
    .section .vectors, "ax"
    .arm
    .global _vectors
_vectors:
    b _start            @ reset
    b .                 @ undefined instruction
    b .                 @ supervisor call
    b .                 @ prefetch abort
    b .                 @ data abort
    b .                 @ reserved
    b _irq_vector       @ IRQ
    b .                 @ FIQ

    .section .text.boot, "ax"
    .arm
    .global _start
_start:
    ldr r0, =_vectors
    mcr p15, 0, r0, c12, c0, 0      @ VBAR
    isb

    cps #0x12                       @ IRQ mode
    ldr sp, =__irq_stack_top
    cps #0x13                       @ SVC mode
    ldr sp, =__svc_stack_top

    ldr r0, =__bss_start
    ldr r1, =__bss_end
    mov r2, #0
1:
    cmp r0, r1
    strlo r2, [r0], #4
    blo 1b

    bl swsleds_main
    b _exit

_irq_vector:
    sub lr, lr, #4
    push {{r0-r3, r12, lr}}
    bl irq_entry_rust
    ldm sp!, {{r0-r3, r12, pc}}^
    "#
);

/// Status of the last run, readable from a debugger.
#[unsafe(no_mangle)]
pub static SWSLEDS_EXIT_STATUS: AtomicI32 = AtomicI32::new(0);

/// Record `status` and park the core with IRQs off.
#[unsafe(no_mangle)]
pub extern "C" fn _exit(status: i32) -> ! {
    SWSLEDS_EXIT_STATUS.store(status, Ordering::SeqCst);
    disable_irq();
    loop {
        wait_for_interrupt();
    }
}
