//! Peripheral Drivers
//!
//! This module contains drivers for reusable peripherals that
//! can be found across different platforms.
//!
//! # Available Peripherals
//!
//! - [`axi_gpio`]: Xilinx AXI GPIO soft core
//! - [`cadence_uart`]: Cadence UART (Zynq PS UARTs)
//! - [`gic`]: ARM Generic Interrupt Controller (PL390)
//! - [`global_timer`]: Cortex-A9 MPCore global timer

pub mod axi_gpio;
pub mod cadence_uart;
pub mod gic;
pub mod global_timer;
