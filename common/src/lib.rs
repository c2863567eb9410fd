//! CPU-level primitives shared by the driver and application crates.
//!
//! - [`arch`]: interrupt masking and idle instructions for the current CPU
//! - [`sync`]: locks that are safe to take from both thread and IRQ context

#![no_std]

pub mod arch;
pub mod sync;
