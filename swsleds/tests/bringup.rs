//! Bring-up sequencing and failure reporting.

mod harness;

use core::cell::{Cell, RefCell};

use drivers::hal::gpio::{Channel, DirectionMask, GpioChannels, SignalValue};
use drivers::mock::{MockError, MockIntc, MockPlatform};
use harness::Board;
use swsleds::bringup::{self, EXIT_FAILURE, exit_status};
use swsleds::config::{
    GPIO_DEVICE_ID, INTC_DEVICE_ID, LAYOUT, LED_CHANNEL, SWITCH_CHANNEL, SWITCH_IRQ,
};
use swsleds::{BringUpError, PollingEcho};

/// GPIO that records every access and can refuse one channel's direction.
struct Spy<'a> {
    refuse: Option<Channel>,
    directions: &'a RefCell<Vec<Channel>>,
    data_accesses: &'a Cell<usize>,
}

impl GpioChannels for Spy<'_> {
    type Error = MockError;

    fn set_direction(&mut self, channel: Channel, _: DirectionMask) -> Result<(), MockError> {
        self.directions.borrow_mut().push(channel);
        if self.refuse == Some(channel) {
            return Err(MockError::Direction(channel));
        }
        Ok(())
    }

    fn read(&self, _: Channel) -> SignalValue {
        self.data_accesses.set(self.data_accesses.get() + 1);
        0
    }

    fn write(&mut self, _: Channel, _: SignalValue) {
        self.data_accesses.set(self.data_accesses.get() + 1);
    }
}

fn configure_refusing(refuse: Channel) -> (Result<(), BringUpError>, Vec<Channel>, usize) {
    let directions = RefCell::new(Vec::new());
    let data_accesses = Cell::new(0);
    let spy = Spy {
        refuse: Some(refuse),
        directions: &directions,
        data_accesses: &data_accesses,
    };

    let result = bringup::configure(spy, LAYOUT).map(|_| ());
    (result, directions.into_inner(), data_accesses.get())
}

#[test]
fn refused_switch_direction_aborts_before_any_io() {
    let (result, directions, accesses) = configure_refusing(SWITCH_CHANNEL);

    assert_eq!(result, Err(BringUpError::Direction(SWITCH_CHANNEL)));
    // The LED channel is never attempted.
    assert_eq!(directions, [SWITCH_CHANNEL]);
    assert_eq!(accesses, 0);
}

#[test]
fn refused_led_direction_aborts_before_any_io() {
    let (result, directions, accesses) = configure_refusing(LED_CHANNEL);

    assert_eq!(result, Err(BringUpError::Direction(LED_CHANNEL)));
    assert_eq!(directions, [SWITCH_CHANNEL, LED_CHANNEL]);
    assert_eq!(accesses, 0);
}

#[test]
fn failed_bring_up_reports_exit_failure() {
    assert_eq!(EXIT_FAILURE, 1);
    assert_eq!(
        exit_status(Err(BringUpError::Direction(SWITCH_CHANNEL))),
        EXIT_FAILURE
    );
    assert_eq!(exit_status(Err(BringUpError::GpioInit)), EXIT_FAILURE);
}

#[test]
fn devices_come_from_the_platform_tables() {
    assert!(unsafe { bringup::open_gpio::<MockPlatform>(GPIO_DEVICE_ID) }.is_ok());
    assert!(unsafe { bringup::open_interrupt_controller::<MockPlatform>(INTC_DEVICE_ID) }.is_ok());

    assert!(matches!(
        unsafe { bringup::open_gpio::<MockPlatform>(9) },
        Err(BringUpError::GpioInit)
    ));
    assert!(matches!(
        unsafe { bringup::open_interrupt_controller::<MockPlatform>(9) },
        Err(BringUpError::ControllerInit)
    ));
}

#[test]
fn run_returns_only_when_arming_fails() {
    let board = Board::new(0b001, MockIntc::new().refuse_connect());

    let result = bringup::run(board.echo, board.adapter());

    assert!(matches!(result, Err(BringUpError::Connect(SWITCH_IRQ))));
    assert_eq!(exit_status(result), EXIT_FAILURE);
    // Nothing observable happened on the LEDs.
    board.gpio(|gpio| assert_eq!(gpio.writes(), 0));
}

#[test]
fn adapters_are_named_for_the_log() {
    use drivers::hal::timer::TickDelay;
    use drivers::mock::{MockGate, MockGpio, MockTimer};
    use swsleds::{InterruptEcho, IoEchoStrategy};

    assert_eq!(
        <PollingEcho<TickDelay<MockTimer>> as IoEchoStrategy<MockGpio>>::NAME,
        "polling"
    );
    assert_eq!(
        <InterruptEcho<MockIntc, MockGate> as IoEchoStrategy<MockGpio>>::NAME,
        "interrupt"
    );
}

#[test]
fn errors_describe_the_failing_step() {
    assert_eq!(
        BringUpError::Direction(LED_CHANNEL).to_string(),
        "direction of channel 2 rejected"
    );
    assert_eq!(
        BringUpError::Connect(SWITCH_IRQ).to_string(),
        "connecting handler to IRQ 61 failed"
    );
}
