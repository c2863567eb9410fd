//! Board harness shared by the integration tests.

#![allow(dead_code)]

use core::cell::Cell;

use common::arch::CurrentIrq;
use common::sync::IrqMutex;
use drivers::hal::gpio::SignalValue;
use drivers::mock::{MockGate, MockGpio, MockIntc};
use swsleds::bringup;
use swsleds::config::{LAYOUT, SWITCH_BINDING, SWITCH_CHANNEL, SWITCH_IRQ};
use swsleds::{InterruptEcho, SharedSwitchLeds};

pub type Echo = SharedSwitchLeds<MockGpio>;
pub type Intc = IrqMutex<MockIntc, CurrentIrq>;

/// Give `value` the `'static` lifetime the handler table needs.
pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// A mock GPIO with configured directions and `switches` on the inputs.
pub fn configured_echo(switches: SignalValue) -> &'static Echo {
    let mut gpio = MockGpio::new();
    gpio.set_switches(SWITCH_CHANNEL, switches);
    let echo = bringup::configure(gpio, LAYOUT).unwrap();
    leak(SharedSwitchLeds::new(echo))
}

/// The GPIO interrupt output wired to a rising-edge controller input.
pub struct Board {
    pub echo: &'static Echo,
    pub intc: &'static Intc,
    line_high: Cell<bool>,
}

impl Board {
    pub fn new(switches: SignalValue, intc: MockIntc) -> Self {
        Self {
            echo: configured_echo(switches),
            intc: leak(IrqMutex::new(intc)),
            line_high: Cell::new(false),
        }
    }

    pub fn adapter(&self) -> InterruptEcho<MockIntc, MockGate> {
        InterruptEcho::new(self.intc, MockGate::new(), SWITCH_BINDING)
    }

    /// Move the switches, then let the controller see the line.
    pub fn flip(&self, switches: SignalValue) {
        self.echo
            .with(|echo| echo.device_mut().set_switches(SWITCH_CHANNEL, switches));
        self.sample_line();
    }

    /// Latch a rising edge of the GPIO interrupt output at the controller.
    pub fn sample_line(&self) {
        let high = self.echo.with(|echo| echo.device().irq_line_asserted());
        if high && !self.line_high.get() {
            self.intc.lock().raise(SWITCH_IRQ);
        }
        self.line_high.set(high);
    }

    pub fn gpio<R>(&self, f: impl FnOnce(&MockGpio) -> R) -> R {
        self.echo.with(|echo| f(echo.device()))
    }

    pub fn controller<R>(&self, f: impl FnOnce(&MockIntc) -> R) -> R {
        f(&self.intc.lock())
    }
}
