//! Hardware Driver Subsystem
//!
//! This module provides a layered architecture for hardware abstraction:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`platform`]: Platform-specific device tables and bring-up (SoC level)
//! - [`peripheral`]: Reusable peripheral drivers
//! - [`console`]: `log` backend over a serial port
//! - `mock`: Host-side fakes for every HAL trait (feature `mock`)
//!
//! # Design Principles
//!
//! 1. **Separation of Concerns**: Platform code is separate from peripheral code
//! 2. **Zero-Cost Abstractions**: HAL traits compile to direct hardware access
//! 3. **Clear Ownership**: Each driver instance is owned by exactly one place
//!
//! # Usage Example
//!
//! ```
//! use drivers::hal::gpio::{Channel, GpioChannels};
//!
//! fn mirror<G: GpioChannels>(gpio: &mut G) {
//!     let switches = gpio.read(Channel::One);
//!     gpio.write(Channel::Two, switches);
//! }
//! ```

#![no_std]

#[cfg(any(test, feature = "mock"))]
extern crate std;

pub mod console;
pub mod hal;
#[cfg(feature = "mock")]
pub mod mock;
pub mod peripheral;
pub mod platform;

/// Index into a platform's device tables.
pub type DeviceId = u16;

// Re-export commonly used types
pub use hal::gpio::{Channel, ChannelMask, DirectionMask, GpioChannelInterrupts, GpioChannels};
pub use hal::interrupt::{InterruptController, IrqHandler, IrqNumber};
pub use hal::serial::SerialPort;
pub use hal::timer::{CountingTimer, TaskDelay};
