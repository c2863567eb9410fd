//! Build-time configuration of the board wiring.

use drivers::DeviceId;
use drivers::hal::gpio::Channel;
use drivers::hal::interrupt::{IrqNumber, Priority, TriggerMode};
use drivers::hal::timer::Ticks;
use log::LevelFilter;

use crate::strategy::interrupt::InterruptBinding;
use crate::transfer::ChannelLayout;

pub const GPIO_DEVICE_ID: DeviceId = 0;
pub const INTC_DEVICE_ID: DeviceId = 0;

/// Slide switches SW0..SW2.
pub const SWITCH_CHANNEL: Channel = Channel::One;
/// LEDs LD0..LD2.
pub const LED_CHANNEL: Channel = Channel::Two;

/// IRQ_F2P[0]: the AXI GPIO interrupt output.
pub const SWITCH_IRQ: IrqNumber = 61;
pub const SWITCH_IRQ_PRIORITY: Priority = 0xA0;
pub const SWITCH_IRQ_TRIGGER: TriggerMode = TriggerMode::RisingEdge;

/// Polling period, 100 ms at the 1 kHz tick.
pub const POLL_PERIOD_TICKS: Ticks = 100;

pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub const LAYOUT: ChannelLayout = ChannelLayout {
    switches: SWITCH_CHANNEL,
    leds: LED_CHANNEL,
};

pub const SWITCH_BINDING: InterruptBinding = InterruptBinding {
    irq: SWITCH_IRQ,
    priority: SWITCH_IRQ_PRIORITY,
    trigger: SWITCH_IRQ_TRIGGER,
};
