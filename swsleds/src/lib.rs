//! Switch to LED mirror for the ZedBoard.
//!
//! The three slide switches on channel 1 of the fabric AXI GPIO are copied
//! onto the LEDs on channel 2. Two adapters drive the copy:
//!
//! - [`PollingEcho`]: a periodic task that mirrors, then sleeps a fixed
//!   number of ticks.
//! - [`InterruptEcho`]: arms the GPIO's rising-edge interrupt so every
//!   switch change mirrors from the handler.
//!
//! Both sit behind [`IoEchoStrategy`]; the firmware binary picks one at
//! build time and hands it to [`bringup::run`].

#![no_std]

pub mod bringup;
pub mod config;
pub mod error;
pub mod strategy;
pub mod transfer;

pub use error::BringUpError;
pub use strategy::IoEchoStrategy;
pub use strategy::interrupt::{InterruptBinding, InterruptEcho};
pub use strategy::polling::PollingEcho;
pub use transfer::{ChannelLayout, SharedSwitchLeds, SwitchLeds};
