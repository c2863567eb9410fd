//! ARMv7-A support.

pub mod cpu;
pub mod irq;
