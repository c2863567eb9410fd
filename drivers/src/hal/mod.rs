//! Hardware Abstraction Layer (HAL)
//!
//! Traits the application is written against. Peripheral drivers and the
//! mock platform implement them; nothing here names a concrete device.
//!
//! - [`gpio`]: channel-wide discrete reads and writes, per-channel
//!   interrupts
//! - [`interrupt`]: line configuration, handler table, dispatch
//! - [`timer`]: free-running counters and task delays
//! - [`serial`]: transmit-only UART

pub mod gpio;
pub mod interrupt;
pub mod serial;
pub mod timer;
