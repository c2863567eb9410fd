//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! GPIO here is channel-oriented: a device exposes one or more banks of
//! discrete lines, and every access reads or writes a whole bank as a
//! single bit pattern. Each line in a bank is configured as input or
//! output through a direction mask.

use bitflags::bitflags;

/// Logic level of every line in a channel, one bit per line.
pub type SignalValue = u32;

/// One bank of lines on a GPIO device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// First bank (channel 1 in device documentation).
    One,
    /// Second bank, only present on dual-channel devices.
    Two,
}

impl Channel {
    /// 1-based channel number as used in device documentation.
    pub const fn index(self) -> u8 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
        }
    }

    /// Channel for a 1-based channel number.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Channel::One),
            2 => Some(Channel::Two),
            _ => None,
        }
    }

    /// Interrupt enable/status bit belonging to this channel.
    pub const fn mask(self) -> ChannelMask {
        match self {
            Channel::One => ChannelMask::CH1,
            Channel::Two => ChannelMask::CH2,
        }
    }
}

impl From<Channel> for ChannelMask {
    fn from(channel: Channel) -> Self {
        channel.mask()
    }
}

bitflags! {
    /// Per-channel interrupt enable/status bits.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ChannelMask: u32 {
        const CH1 = 1 << 0;
        const CH2 = 1 << 1;
    }
}

/// Direction bits for a channel: a set bit makes the line an input, a
/// clear bit makes it an output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectionMask(u32);

impl DirectionMask {
    /// Three low lines as inputs (the board's slide switches).
    pub const SWITCHES: Self = Self(0x07);

    /// Everything else as outputs; the three low lines drive the LEDs.
    pub const LEDS: Self = Self(!0x07);

    /// Every line an input.
    pub const ALL_INPUTS: Self = Self(u32::MAX);

    /// Every line an output.
    pub const ALL_OUTPUTS: Self = Self(0);

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw register value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Lines configured as inputs.
    pub const fn inputs(self) -> u32 {
        self.0
    }

    /// Lines configured as outputs.
    pub const fn outputs(self) -> u32 {
        !self.0
    }
}

/// Discrete access to the channels of one GPIO device.
///
/// Directions are configured once, before the first read or write.
/// Once a channel is configured, reads and writes cannot fail.
pub trait GpioChannels {
    /// Error type for configuration.
    type Error: core::fmt::Debug;

    /// Configure the direction of every line in `channel`.
    fn set_direction(&mut self, channel: Channel, direction: DirectionMask)
    -> Result<(), Self::Error>;

    /// Read the current level of every line in `channel`.
    fn read(&self, channel: Channel) -> SignalValue;

    /// Drive the output lines of `channel` to `value`.
    ///
    /// Bits belonging to input lines are ignored by the hardware.
    fn write(&mut self, channel: Channel, value: SignalValue);
}

/// Extension trait for GPIO devices that can raise an interrupt when an
/// input channel changes.
pub trait GpioChannelInterrupts: GpioChannels {
    /// Enable the per-channel interrupt for every channel in `mask`.
    fn enable_interrupt(&mut self, mask: ChannelMask);

    /// Disable the per-channel interrupt for every channel in `mask`.
    fn disable_interrupt(&mut self, mask: ChannelMask);

    /// Acknowledge a latched interrupt condition so it can fire again.
    fn clear_interrupt(&mut self, mask: ChannelMask);

    /// Channels with a latched interrupt condition.
    fn interrupt_status(&self) -> ChannelMask;

    /// Let the device drive its interrupt output.
    fn global_interrupt_enable(&mut self);

    /// Stop the device from driving its interrupt output.
    fn global_interrupt_disable(&mut self);
}
