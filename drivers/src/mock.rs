//! Host-side fakes for every HAL trait.
//!
//! These stand in for the board in integration tests. Each fake records
//! what was done to it so tests can assert on register-level effects, and
//! each can be told to refuse the operations that can fail on hardware.

use core::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use crate::DeviceId;
use crate::hal::gpio::{
    Channel, ChannelMask, DirectionMask, GpioChannelInterrupts, GpioChannels, SignalValue,
};
use crate::hal::interrupt::{
    ConfigurableInterruptController, ExceptionGate, HandlerRegistry, InterruptController,
    IrqHandler, IrqNumber, IrqSource, Priority, PriorityInterruptController, TriggerMode,
};
use crate::hal::serial::SerialPort;
use crate::hal::timer::CountingTimer;
use crate::platform::Platform;

/// Lines covered by [`MockIntc`].
pub const MOCK_IRQS: usize = 96;

/// Failure reported by a fake told to refuse an operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MockError {
    /// No fake with this device id.
    DeviceNotFound(DeviceId),
    /// Direction configuration of this channel was refused.
    Direction(Channel),
    /// Line outside the controller.
    InvalidIrq(IrqNumber),
    /// The fake was told to refuse this operation.
    Refused,
}

// ============================================================================
// GPIO
// ============================================================================

/// Dual-channel GPIO device with an interrupt output.
#[derive(Debug)]
pub struct MockGpio {
    pins: [SignalValue; 2],
    latch: [SignalValue; 2],
    directions: [Option<DirectionMask>; 2],
    ier: ChannelMask,
    gie: bool,
    isr: ChannelMask,
    reads: Cell<usize>,
    clears: usize,
    write_log: Vec<(Channel, SignalValue)>,
    failing_direction: Option<Channel>,
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            pins: [0; 2],
            latch: [0; 2],
            directions: [None; 2],
            ier: ChannelMask::empty(),
            gie: false,
            isr: ChannelMask::empty(),
            reads: Cell::new(0),
            clears: 0,
            write_log: Vec::new(),
            failing_direction: None,
        }
    }

    /// Make `set_direction` on `channel` fail.
    pub fn fail_direction(mut self, channel: Channel) -> Self {
        self.failing_direction = Some(channel);
        self
    }

    fn slot(channel: Channel) -> usize {
        channel.index() as usize - 1
    }

    /// Drive the external input levels of `channel`.
    ///
    /// A change latches the channel's interrupt status while its
    /// interrupt is enabled.
    pub fn set_switches(&mut self, channel: Channel, value: SignalValue) {
        let slot = Self::slot(channel);
        let changed = self.pins[slot] != value;
        self.pins[slot] = value;
        if changed && self.ier.contains(channel.mask()) {
            self.isr |= channel.mask();
        }
    }

    /// Level of the device's interrupt output.
    pub fn irq_line_asserted(&self) -> bool {
        self.gie && self.isr.intersects(self.ier)
    }

    /// Last value written to `channel`.
    pub fn output(&self, channel: Channel) -> SignalValue {
        self.latch[Self::slot(channel)]
    }

    pub fn direction(&self, channel: Channel) -> Option<DirectionMask> {
        self.directions[Self::slot(channel)]
    }

    pub fn interrupt_enabled(&self, channel: Channel) -> bool {
        self.ier.contains(channel.mask())
    }

    pub fn global_interrupt_enabled(&self) -> bool {
        self.gie
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.write_log.len()
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn write_log(&self) -> &[(Channel, SignalValue)] {
        &self.write_log
    }
}

impl GpioChannels for MockGpio {
    type Error = MockError;

    fn set_direction(
        &mut self,
        channel: Channel,
        direction: DirectionMask,
    ) -> Result<(), MockError> {
        if self.failing_direction == Some(channel) {
            return Err(MockError::Direction(channel));
        }
        self.directions[Self::slot(channel)] = Some(direction);
        Ok(())
    }

    fn read(&self, channel: Channel) -> SignalValue {
        self.reads.set(self.reads.get() + 1);
        let slot = Self::slot(channel);
        let direction = self.directions[slot].unwrap_or(DirectionMask::ALL_INPUTS);
        (self.pins[slot] & direction.inputs()) | (self.latch[slot] & direction.outputs())
    }

    fn write(&mut self, channel: Channel, value: SignalValue) {
        self.latch[Self::slot(channel)] = value;
        self.write_log.push((channel, value));
    }
}

impl GpioChannelInterrupts for MockGpio {
    fn enable_interrupt(&mut self, mask: ChannelMask) {
        self.ier |= mask;
    }

    fn disable_interrupt(&mut self, mask: ChannelMask) {
        self.ier.remove(mask);
    }

    fn clear_interrupt(&mut self, mask: ChannelMask) {
        self.clears += 1;
        self.isr.remove(mask);
    }

    fn interrupt_status(&self) -> ChannelMask {
        self.isr
    }

    fn global_interrupt_enable(&mut self) {
        self.gie = true;
    }

    fn global_interrupt_disable(&mut self) {
        self.gie = false;
    }
}

// ============================================================================
// Interrupt Controller
// ============================================================================

/// Interrupt controller with a handler table and a FIFO of pending lines.
pub struct MockIntc {
    handlers: [Option<&'static dyn IrqHandler>; MOCK_IRQS],
    enabled: [bool; MOCK_IRQS],
    priorities: [Priority; MOCK_IRQS],
    triggers: [Option<TriggerMode>; MOCK_IRQS],
    pending: Vec<IrqNumber>,
    acks: usize,
    eois: Vec<IrqNumber>,
    refuse_connect: bool,
    refuse_enable: bool,
    refuse_line_config: bool,
}

impl Default for MockIntc {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIntc {
    pub fn new() -> Self {
        Self {
            handlers: [None; MOCK_IRQS],
            enabled: [false; MOCK_IRQS],
            priorities: [0; MOCK_IRQS],
            triggers: [None; MOCK_IRQS],
            pending: Vec::new(),
            acks: 0,
            eois: Vec::new(),
            refuse_connect: false,
            refuse_enable: false,
            refuse_line_config: false,
        }
    }

    pub fn refuse_connect(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    pub fn refuse_enable(mut self) -> Self {
        self.refuse_enable = true;
        self
    }

    /// Make priority and trigger configuration fail.
    pub fn refuse_line_config(mut self) -> Self {
        self.refuse_line_config = true;
        self
    }

    fn slot(irq: IrqNumber) -> Result<usize, MockError> {
        let slot = irq as usize;
        if slot < MOCK_IRQS {
            Ok(slot)
        } else {
            Err(MockError::InvalidIrq(irq))
        }
    }

    /// Signal `irq` from a peripheral. Ignored while the line is disabled
    /// or already pending.
    pub fn raise(&mut self, irq: IrqNumber) {
        let Ok(slot) = Self::slot(irq) else {
            return;
        };
        if self.enabled[slot] && !self.pending.contains(&irq) {
            self.pending.push(irq);
        }
    }

    pub fn is_enabled(&self, irq: IrqNumber) -> bool {
        Self::slot(irq).is_ok_and(|slot| self.enabled[slot])
    }

    pub fn trigger(&self, irq: IrqNumber) -> Option<TriggerMode> {
        Self::slot(irq).ok().and_then(|slot| self.triggers[slot])
    }

    pub fn acks(&self) -> usize {
        self.acks
    }

    pub fn eois(&self) -> &[IrqNumber] {
        &self.eois
    }
}

impl InterruptController for MockIntc {
    type Error = MockError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), MockError> {
        if self.refuse_enable {
            return Err(MockError::Refused);
        }
        self.enabled[Self::slot(irq)?] = true;
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), MockError> {
        self.enabled[Self::slot(irq)?] = false;
        self.pending.retain(|&p| p != irq);
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> Result<bool, MockError> {
        Self::slot(irq)?;
        Ok(self.pending.contains(&irq))
    }

    fn acknowledge(&mut self) -> Option<IrqNumber> {
        if self.pending.is_empty() {
            return None;
        }
        self.acks += 1;
        Some(self.pending.remove(0))
    }

    fn end_of_interrupt(&mut self, irq: IrqNumber) -> Result<(), MockError> {
        self.eois.push(irq);
        Ok(())
    }
}

impl PriorityInterruptController for MockIntc {
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), MockError> {
        if self.refuse_line_config {
            return Err(MockError::Refused);
        }
        self.priorities[Self::slot(irq)?] = priority;
        Ok(())
    }

    fn get_priority(&self, irq: IrqNumber) -> Result<Priority, MockError> {
        Ok(self.priorities[Self::slot(irq)?])
    }
}

impl ConfigurableInterruptController for MockIntc {
    fn configure_trigger(&mut self, irq: IrqNumber, mode: TriggerMode) -> Result<(), MockError> {
        if self.refuse_line_config {
            return Err(MockError::Refused);
        }
        self.triggers[Self::slot(irq)?] = Some(mode);
        Ok(())
    }
}

impl HandlerRegistry for MockIntc {
    fn connect(
        &mut self,
        irq: IrqNumber,
        handler: &'static dyn IrqHandler,
    ) -> Result<(), MockError> {
        if self.refuse_connect {
            return Err(MockError::Refused);
        }
        self.handlers[Self::slot(irq)?] = Some(handler);
        Ok(())
    }

    fn disconnect(&mut self, irq: IrqNumber) {
        if let Ok(slot) = Self::slot(irq) {
            self.handlers[slot] = None;
        }
    }

    fn handler(&self, irq: IrqNumber) -> Option<&'static dyn IrqHandler> {
        Self::slot(irq).ok().and_then(|slot| self.handlers[slot])
    }
}

// ============================================================================
// Exception Gate
// ============================================================================

/// CPU side of the interrupt path.
///
/// Nothing is taken asynchronously: [`fire`](Self::fire) plays the part
/// of the core taking the IRQ exception.
#[derive(Default)]
pub struct MockGate {
    source: Option<&'static dyn IrqSource>,
    unmasked: bool,
    waits: usize,
}

impl MockGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the IRQ exception if it is unmasked, draining every pending
    /// line. Returns how many were serviced.
    pub fn fire(&self) -> usize {
        match self.source {
            Some(source) if self.unmasked => source.dispatch_all(),
            _ => 0,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_unmasked(&self) -> bool {
        self.unmasked
    }

    pub fn waits(&self) -> usize {
        self.waits
    }
}

impl ExceptionGate for MockGate {
    fn install(&mut self, source: &'static dyn IrqSource) {
        self.source = Some(source);
    }

    fn unmask(&mut self) {
        self.unmasked = true;
    }

    fn mask(&mut self) {
        self.unmasked = false;
    }

    fn wait_for_interrupt(&mut self) {
        self.waits += 1;
        self.fire();
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Clock that advances a fixed step on every read.
///
/// Clones share the same clock, so a test can keep one to observe time
/// while another is moved into the code under test.
#[derive(Debug, Clone)]
pub struct MockTimer {
    now: Rc<Cell<u64>>,
    step_us: u64,
}

impl MockTimer {
    pub fn new(step_us: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            step_us,
        }
    }

    /// Current time without advancing the clock.
    pub fn peek_us(&self) -> u64 {
        self.now.get()
    }
}

impl CountingTimer for MockTimer {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step_us);
        now
    }
}

// ============================================================================
// Serial
// ============================================================================

/// Serial port capturing everything written to it.
#[derive(Debug, Default)]
pub struct MockSerial {
    written: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl SerialPort for MockSerial {
    type Error = MockError;

    fn write_byte(&mut self, byte: u8) -> Result<(), MockError> {
        self.written.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MockError> {
        Ok(())
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Platform with one GPIO and one interrupt controller, both device 0.
pub struct MockPlatform;

/// Clock step of the timer handed out by [`MockPlatform`].
pub const MOCK_PLATFORM_TIMER_STEP_US: u64 = 250;

impl Platform for MockPlatform {
    type Gpio = MockGpio;
    type Intc = MockIntc;
    type Timer = MockTimer;
    type Console = MockSerial;

    fn name() -> &'static str {
        "mock"
    }

    unsafe fn gpio(id: DeviceId) -> Result<MockGpio, MockError> {
        match id {
            0 => Ok(MockGpio::new()),
            _ => Err(MockError::DeviceNotFound(id)),
        }
    }

    unsafe fn interrupt_controller(id: DeviceId) -> Result<MockIntc, MockError> {
        match id {
            0 => Ok(MockIntc::new()),
            _ => Err(MockError::DeviceNotFound(id)),
        }
    }

    unsafe fn timer() -> MockTimer {
        MockTimer::new(MOCK_PLATFORM_TIMER_STEP_US)
    }

    unsafe fn console() -> MockSerial {
        MockSerial::new()
    }
}
