//! Interrupt adapter: arm, edge handling, and disarm against the mock
//! board.

mod harness;

use drivers::hal::gpio::GpioChannelInterrupts;
use drivers::hal::interrupt::{
    HandlerRegistry, InterruptController, PriorityInterruptController, TriggerMode,
};
use drivers::mock::MockIntc;
use harness::Board;
use swsleds::BringUpError;
use swsleds::config::{LED_CHANNEL, SWITCH_CHANNEL, SWITCH_IRQ, SWITCH_IRQ_PRIORITY};

#[test]
fn arm_configures_every_layer() {
    let board = Board::new(0b000, MockIntc::new());
    let mut adapter = board.adapter();

    adapter.arm(board.echo).unwrap();

    board.controller(|intc| {
        assert_eq!(intc.get_priority(SWITCH_IRQ), Ok(SWITCH_IRQ_PRIORITY));
        assert_eq!(intc.trigger(SWITCH_IRQ), Some(TriggerMode::RisingEdge));
        assert!(intc.is_enabled(SWITCH_IRQ));
        assert!(intc.handler(SWITCH_IRQ).is_some());
    });
    board.gpio(|gpio| {
        assert!(gpio.interrupt_enabled(SWITCH_CHANNEL));
        assert!(!gpio.interrupt_enabled(LED_CHANNEL));
        assert!(gpio.global_interrupt_enabled());
    });
    assert!(adapter.gate().is_installed());
    assert!(adapter.gate().is_unmasked());
}

#[test]
fn start_shows_the_switches_before_any_edge() {
    let board = Board::new(0b110, MockIntc::new());
    let mut adapter = board.adapter();

    assert_eq!(adapter.start(board.echo), Ok(0b110));

    board.gpio(|gpio| {
        assert_eq!(gpio.output(LED_CHANNEL), 0b110);
        assert_eq!(gpio.writes(), 1);
    });
    // Nothing pending: the gate finds no work.
    assert_eq!(adapter.gate().fire(), 0);
}

#[test]
fn edge_runs_handler_once_and_rearms() {
    let board = Board::new(0b000, MockIntc::new());
    let mut adapter = board.adapter();
    adapter.start(board.echo).unwrap();

    board.flip(0b101);
    assert_eq!(adapter.gate().fire(), 1);
    board.sample_line();

    board.gpio(|gpio| {
        assert_eq!(gpio.output(LED_CHANNEL), 0b101);
        // Initial mirror plus one from the handler.
        assert_eq!(gpio.writes(), 2);
        assert_eq!(gpio.clears(), 1);
        assert!(gpio.interrupt_status().is_empty());
        assert!(gpio.interrupt_enabled(SWITCH_CHANNEL));
    });
    board.controller(|intc| {
        assert_eq!(intc.acks(), 1);
        assert_eq!(intc.eois(), &[SWITCH_IRQ]);
        assert!(intc.is_enabled(SWITCH_IRQ));
    });
}

#[test]
fn no_edge_is_lost_after_the_condition_is_cleared() {
    let board = Board::new(0b000, MockIntc::new());
    let mut adapter = board.adapter();
    adapter.start(board.echo).unwrap();

    for (edge, pattern) in [0b001, 0b011, 0b111, 0b010].into_iter().enumerate() {
        board.flip(pattern);
        assert_eq!(adapter.gate().fire(), 1);
        board.sample_line();

        board.gpio(|gpio| {
            assert_eq!(gpio.output(LED_CHANNEL), pattern);
            assert_eq!(gpio.clears(), edge + 1);
        });
    }
    board.controller(|intc| assert_eq!(intc.acks(), 4));
}

#[test]
fn unchanged_switches_raise_nothing() {
    let board = Board::new(0b011, MockIntc::new());
    let mut adapter = board.adapter();
    adapter.start(board.echo).unwrap();

    board.flip(0b011);

    assert_eq!(adapter.gate().fire(), 0);
    board.gpio(|gpio| assert_eq!(gpio.clears(), 0));
}

#[test]
fn masked_gate_defers_the_edge() {
    use drivers::hal::interrupt::ExceptionGate;
    use drivers::mock::MockGate;
    use swsleds::InterruptEcho;
    use swsleds::config::SWITCH_BINDING;

    let board = Board::new(0b000, MockIntc::new());
    let mut adapter = InterruptEcho::new(board.intc, MockGate::new(), SWITCH_BINDING);
    adapter.arm(board.echo).unwrap();

    board.flip(0b100);
    board.controller(|intc| assert_eq!(intc.is_pending(SWITCH_IRQ), Ok(true)));

    // The pending line survives until the core takes the exception.
    let mut gate = MockGate::new();
    gate.install(board.intc);
    assert_eq!(gate.fire(), 0);
    gate.unmask();
    gate.wait_for_interrupt();

    board.gpio(|gpio| assert_eq!(gpio.output(LED_CHANNEL), 0b100));
    assert_eq!(gate.waits(), 1);
}

#[test]
fn refused_line_config_fails_before_connect() {
    let board = Board::new(0b000, MockIntc::new().refuse_line_config());
    let mut adapter = board.adapter();

    assert_eq!(
        adapter.arm(board.echo),
        Err(BringUpError::LineConfig(SWITCH_IRQ))
    );
    board.controller(|intc| assert!(intc.handler(SWITCH_IRQ).is_none()));
    assert!(!adapter.gate().is_unmasked());
}

#[test]
fn refused_connect_leaves_everything_disarmed() {
    let board = Board::new(0b000, MockIntc::new().refuse_connect());
    let mut adapter = board.adapter();

    assert_eq!(adapter.start(board.echo), Err(BringUpError::Connect(SWITCH_IRQ)));

    board.controller(|intc| assert!(!intc.is_enabled(SWITCH_IRQ)));
    board.gpio(|gpio| {
        assert!(!gpio.interrupt_enabled(SWITCH_CHANNEL));
        assert_eq!(gpio.writes(), 0);
    });
    assert!(!adapter.gate().is_installed());
}

#[test]
fn refused_enable_disconnects_the_handler() {
    let board = Board::new(0b000, MockIntc::new().refuse_enable());
    let mut adapter = board.adapter();

    assert_eq!(
        adapter.arm(board.echo),
        Err(BringUpError::LineConfig(SWITCH_IRQ))
    );
    board.controller(|intc| assert!(intc.handler(SWITCH_IRQ).is_none()));
}

#[test]
fn disarm_stops_edges_reaching_the_leds() {
    let board = Board::new(0b000, MockIntc::new());
    let mut adapter = board.adapter();
    adapter.start(board.echo).unwrap();

    adapter.disarm(board.echo).unwrap();

    board.controller(|intc| {
        assert!(!intc.is_enabled(SWITCH_IRQ));
        assert!(intc.handler(SWITCH_IRQ).is_none());
    });
    board.gpio(|gpio| assert!(!gpio.interrupt_enabled(SWITCH_CHANNEL)));

    board.flip(0b111);
    assert_eq!(adapter.gate().fire(), 0);
    board.gpio(|gpio| assert_eq!(gpio.output(LED_CHANNEL), 0b000));
}

#[test]
fn disarmed_line_can_be_armed_again() {
    let board = Board::new(0b000, MockIntc::new());
    let mut adapter = board.adapter();
    adapter.arm(board.echo).unwrap();
    adapter.disarm(board.echo).unwrap();

    adapter.arm(board.echo).unwrap();
    board.flip(0b010);
    assert_eq!(adapter.gate().fire(), 1);
    board.gpio(|gpio| assert_eq!(gpio.output(LED_CHANNEL), 0b010));
}
