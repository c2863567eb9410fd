//! Xilinx AXI GPIO Driver
//!
//! Soft IP core with one or two channels of up to 32 lines each. Every
//! channel has a data register and a tri-state (direction) register; a
//! set tri-state bit makes the line an input.
//!
//! When built with interrupt support the core raises its interrupt output
//! whenever an input of an enabled channel changes. The per-channel
//! status bits are toggle-on-write: writing a 1 clears a latched bit.
//!
//! # Example
//!
//! ```no_run
//! use drivers::hal::gpio::{Channel, DirectionMask, GpioChannels};
//! use drivers::peripheral::axi_gpio::{AxiGpio, AxiGpioConfig};
//!
//! let config = AxiGpioConfig {
//!     device_id: 0,
//!     base: 0x4120_0000,
//!     interrupt_present: true,
//!     dual_channel: true,
//! };
//! let mut gpio = unsafe { AxiGpio::new(&config) };
//! gpio.set_direction(Channel::One, DirectionMask::SWITCHES).unwrap();
//! let switches = gpio.read(Channel::One);
//! ```

use crate::DeviceId;
use crate::hal::gpio::{
    Channel, ChannelMask, DirectionMask, GpioChannelInterrupts, GpioChannels, SignalValue,
};
use core::ptr::{read_volatile, write_volatile};

// Register offsets (channel 1; channel 2 registers follow at +CHANNEL_STRIDE)
const DATA_OFFSET: usize = 0x000;
const TRI_OFFSET: usize = 0x004;
const CHANNEL_STRIDE: usize = 0x008;

// Interrupt registers
const GIER_OFFSET: usize = 0x11C;
const ISR_OFFSET: usize = 0x120;
const IER_OFFSET: usize = 0x128;

/// Global interrupt enable bit in GIER.
const GIER_ENABLE: u32 = 1 << 31;

/// Build-time parameters of one AXI GPIO instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxiGpioConfig {
    pub device_id: DeviceId,
    /// Physical base address of the register block.
    pub base: usize,
    /// Core was synthesised with its interrupt output.
    pub interrupt_present: bool,
    /// Core was synthesised with a second channel.
    pub dual_channel: bool,
}

/// AXI GPIO errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// No instance with this device id exists in the hardware design.
    DeviceNotFound(DeviceId),
    /// Channel 2 addressed on a single-channel core.
    InvalidChannel(Channel),
}

/// AXI GPIO driver.
#[derive(Debug)]
pub struct AxiGpio {
    base: usize,
    interrupt_present: bool,
    dual_channel: bool,
}

impl AxiGpio {
    /// Create a driver for the instance described by `config`.
    ///
    /// # Safety
    ///
    /// - `config.base` must point to a valid AXI GPIO register block
    /// - Only one instance should exist per core
    pub const unsafe fn new(config: &AxiGpioConfig) -> Self {
        Self {
            base: config.base,
            interrupt_present: config.interrupt_present,
            dual_channel: config.dual_channel,
        }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Offset of `offset` within `channel`'s register pair.
    const fn channel_offset(channel: Channel, offset: usize) -> usize {
        match channel {
            Channel::One => offset,
            Channel::Two => offset + CHANNEL_STRIDE,
        }
    }

    fn check_channel(&self, channel: Channel) -> Result<(), GpioError> {
        match channel {
            Channel::Two if !self.dual_channel => Err(GpioError::InvalidChannel(channel)),
            _ => Ok(()),
        }
    }

    /// Mask of the interrupt bits that exist on this core.
    fn valid_mask(&self) -> ChannelMask {
        if self.dual_channel {
            ChannelMask::CH1 | ChannelMask::CH2
        } else {
            ChannelMask::CH1
        }
    }

    /// Current contents of a channel's direction register.
    pub fn direction(&self, channel: Channel) -> Result<DirectionMask, GpioError> {
        self.check_channel(channel)?;
        Ok(DirectionMask::new(
            self.read_reg(Self::channel_offset(channel, TRI_OFFSET)),
        ))
    }

    pub fn interrupt_present(&self) -> bool {
        self.interrupt_present
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl GpioChannels for AxiGpio {
    type Error = GpioError;

    fn set_direction(
        &mut self,
        channel: Channel,
        direction: DirectionMask,
    ) -> Result<(), Self::Error> {
        self.check_channel(channel)?;
        self.write_reg(Self::channel_offset(channel, TRI_OFFSET), direction.bits());
        Ok(())
    }

    fn read(&self, channel: Channel) -> SignalValue {
        if self.check_channel(channel).is_err() {
            return 0;
        }
        self.read_reg(Self::channel_offset(channel, DATA_OFFSET))
    }

    fn write(&mut self, channel: Channel, value: SignalValue) {
        if self.check_channel(channel).is_ok() {
            self.write_reg(Self::channel_offset(channel, DATA_OFFSET), value);
        }
    }
}

impl GpioChannelInterrupts for AxiGpio {
    fn enable_interrupt(&mut self, mask: ChannelMask) {
        if !self.interrupt_present {
            return;
        }
        let ier = self.read_reg(IER_OFFSET);
        self.write_reg(IER_OFFSET, ier | (mask & self.valid_mask()).bits());
    }

    fn disable_interrupt(&mut self, mask: ChannelMask) {
        if !self.interrupt_present {
            return;
        }
        let ier = self.read_reg(IER_OFFSET);
        self.write_reg(IER_OFFSET, ier & !mask.bits());
    }

    fn clear_interrupt(&mut self, mask: ChannelMask) {
        if !self.interrupt_present {
            return;
        }
        // Toggle-on-write: only write bits that are actually set, or a
        // clear bit would be set instead.
        let isr = self.read_reg(ISR_OFFSET);
        self.write_reg(ISR_OFFSET, isr & mask.bits());
    }

    fn interrupt_status(&self) -> ChannelMask {
        if !self.interrupt_present {
            return ChannelMask::empty();
        }
        ChannelMask::from_bits_truncate(self.read_reg(ISR_OFFSET))
    }

    fn global_interrupt_enable(&mut self) {
        if self.interrupt_present {
            self.write_reg(GIER_OFFSET, GIER_ENABLE);
        }
    }

    fn global_interrupt_disable(&mut self) {
        if self.interrupt_present {
            self.write_reg(GIER_OFFSET, 0);
        }
    }
}
