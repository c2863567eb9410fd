//! Platform Abstraction Layer
//!
//! This module provides a platform-agnostic interface for hardware access.
//! Each platform (Zynq-7000, ...) implements the Platform trait and hands
//! out owned driver instances for the devices in its hardware design.
//!
//! # Usage
//!
//! ```
//! use drivers::platform::Platform;
//!
//! fn open<P: Platform>() -> Option<(P::Gpio, P::Intc)> {
//!     let gpio = unsafe { P::gpio(0) }.ok()?;
//!     let intc = unsafe { P::interrupt_controller(0) }.ok()?;
//!     Some((gpio, intc))
//! }
//! ```

use crate::DeviceId;
use crate::hal::gpio::{GpioChannelInterrupts, GpioChannels};
use crate::hal::interrupt::{
    ConfigurableInterruptController, HandlerRegistry, InterruptController,
    PriorityInterruptController,
};
use crate::hal::serial::SerialPort;
use crate::hal::timer::CountingTimer;

/// Platform trait - implemented by each supported platform
pub trait Platform {
    type Gpio: GpioChannelInterrupts + Send;
    type Intc: HandlerRegistry
        + PriorityInterruptController
        + ConfigurableInterruptController
        + Send;
    type Timer: CountingTimer;
    type Console: SerialPort + Send;

    /// Platform name for debugging
    fn name() -> &'static str;

    /// Look up and initialise the GPIO device `id`.
    ///
    /// # Safety
    /// Must only be called once per device.
    unsafe fn gpio(id: DeviceId) -> Result<Self::Gpio, <Self::Gpio as GpioChannels>::Error>;

    /// Look up and initialise the interrupt controller `id`.
    ///
    /// Every line is left disabled with no handler connected.
    ///
    /// # Safety
    /// Must only be called once, before IRQs are unmasked.
    unsafe fn interrupt_controller(
        id: DeviceId,
    ) -> Result<Self::Intc, <Self::Intc as InterruptController>::Error>;

    /// Free-running system timer, started.
    ///
    /// # Safety
    /// Must only be called once.
    unsafe fn timer() -> Self::Timer;

    /// Serial port carrying diagnostic output.
    ///
    /// # Safety
    /// Must only be called once.
    unsafe fn console() -> Self::Console;
}

// Platform selection based on Cargo features. Host builds with only the
// `mock` feature have no platform.
cfg_if::cfg_if! {
    if #[cfg(feature = "zynq7000")] {
        pub mod zynq7000;
        pub use zynq7000::Zynq7000Platform as CurrentPlatform;
    }
}
