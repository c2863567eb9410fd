//! Polling adapter: mirror, then sleep for the configured period.

mod harness;

use drivers::hal::timer::{TaskDelay, TickDelay, Ticks};
use drivers::mock::MockTimer;
use harness::configured_echo;
use swsleds::PollingEcho;
use swsleds::config::{LED_CHANNEL, POLL_PERIOD_TICKS, SWITCH_CHANNEL};

/// Clock step of the fake timer. Small against the period.
const STEP_US: u64 = 50;
const PERIOD_US: u64 = POLL_PERIOD_TICKS as u64 * 1_000;

#[derive(Default)]
struct RecordingDelay {
    requests: Vec<Ticks>,
}

impl TaskDelay for RecordingDelay {
    fn delay_ticks(&mut self, ticks: Ticks) {
        self.requests.push(ticks);
    }
}

#[test]
fn one_tick_mirrors_then_sleeps_for_the_period() {
    let echo = configured_echo(0b011);
    let mut polling = PollingEcho::new(RecordingDelay::default(), POLL_PERIOD_TICKS);

    assert_eq!(polling.step(echo), 0b011);

    echo.with(|echo| assert_eq!(echo.device().output(LED_CHANNEL), 0b011));
    assert_eq!(polling.delay().requests, [POLL_PERIOD_TICKS]);
}

#[test]
fn updates_are_at_least_one_period_apart() {
    let echo = configured_echo(0b000);
    let clock = MockTimer::new(STEP_US);
    let mut polling = PollingEcho::new(TickDelay::new(clock.clone()), POLL_PERIOD_TICKS);

    let mut update_times = Vec::new();
    for pattern in [0b001, 0b010, 0b100, 0b111] {
        echo.with(|echo| echo.device_mut().set_switches(SWITCH_CHANNEL, pattern));
        update_times.push(clock.peek_us());
        assert_eq!(polling.step(echo), pattern);
    }

    for pair in update_times.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= PERIOD_US, "updates only {gap} us apart");
        // Unloaded: the delay overshoots by at most a couple of clock reads.
        assert!(gap <= PERIOD_US + 2 * STEP_US, "updates {gap} us apart");
    }
}

#[test]
fn unchanged_switches_keep_the_leds_steady() {
    let echo = configured_echo(0b110);
    let mut polling = PollingEcho::new(RecordingDelay::default(), POLL_PERIOD_TICKS);

    for _ in 0..5 {
        polling.step(echo);
    }

    echo.with(|echo| {
        let gpio = echo.device();
        assert_eq!(gpio.writes(), 5);
        assert!(gpio.write_log().iter().all(|&(ch, v)| ch == LED_CHANNEL && v == 0b110));
    });
    assert_eq!(polling.delay().requests.len(), 5);
}
