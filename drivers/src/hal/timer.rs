//! Timer Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for free-running
//! counters and for the timed suspension point used by periodic tasks.

/// Scheduler tick rate. One tick is one millisecond.
pub const TICK_RATE_HZ: u32 = 1000;

/// A duration in scheduler ticks.
pub type Ticks = u32;

/// Free-running counter.
pub trait CountingTimer {
    /// Read the current timer counter value in microseconds.
    ///
    /// This is a free-running counter that increments continuously.
    fn now_us(&self) -> u64;

    /// Busy-wait delay for the specified number of microseconds.
    ///
    /// This blocks the CPU and should only be used for short delays.
    fn delay_us(&self, us: u64) {
        let start = self.now_us();

        while self.now_us().wrapping_sub(start) < us {
            core::hint::spin_loop();
        }
    }
}

/// Voluntary suspension point of a periodic task.
///
/// Implementations must not return before `ticks` have elapsed. They may
/// return later.
pub trait TaskDelay {
    fn delay_ticks(&mut self, ticks: Ticks);
}

/// [`TaskDelay`] over a [`CountingTimer`].
///
/// Used where the only task is the periodic one: waiting out the delay is
/// all the processor has to do.
#[derive(Debug)]
pub struct TickDelay<T> {
    timer: T,
}

impl<T: CountingTimer> TickDelay<T> {
    pub const fn new(timer: T) -> Self {
        Self { timer }
    }

    /// Convert ticks to microseconds.
    pub const fn ticks_to_us(ticks: Ticks) -> u64 {
        ticks as u64 * 1_000_000 / TICK_RATE_HZ as u64
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

impl<T: CountingTimer> TaskDelay for TickDelay<T> {
    fn delay_ticks(&mut self, ticks: Ticks) {
        self.timer.delay_us(Self::ticks_to_us(ticks));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Clock that moves forward 250 us per read.
    struct Stepping(Cell<u64>);

    impl CountingTimer for Stepping {
        fn now_us(&self) -> u64 {
            let now = self.0.get();
            self.0.set(now + 250);
            now
        }
    }

    #[test]
    fn tick_conversion() {
        assert_eq!(TickDelay::<Stepping>::ticks_to_us(1), 1_000);
        assert_eq!(TickDelay::<Stepping>::ticks_to_us(100), 100_000);
    }

    #[test]
    fn delay_waits_at_least_the_requested_ticks() {
        let mut delay = TickDelay::new(Stepping(Cell::new(0)));
        delay.delay_ticks(100);

        let elapsed = delay.timer().0.get();
        assert!(elapsed >= 100_000, "returned after {elapsed} us");
        // One read past the deadline, one more for the final check.
        assert!(elapsed <= 100_000 + 2 * 250);
    }

    /// Timer with its own delay, e.g. one backed by a hardware comparator.
    struct OwnDelay(Cell<Option<u64>>);

    impl CountingTimer for OwnDelay {
        fn now_us(&self) -> u64 {
            0
        }

        fn delay_us(&self, us: u64) {
            self.0.set(Some(us));
        }
    }

    #[test]
    fn tick_delay_waits_through_the_timer() {
        let mut delay = TickDelay::new(OwnDelay(Cell::new(None)));

        delay.delay_ticks(100);
        assert_eq!(delay.timer().0.get(), Some(100_000));

        // No 32-bit overflow for long periods.
        delay.delay_ticks(Ticks::MAX);
        assert_eq!(delay.timer().0.get(), Some(4_294_967_295_000));
    }

    #[test]
    fn zero_ticks_returns_immediately() {
        let mut delay = TickDelay::new(Stepping(Cell::new(0)));
        delay.delay_ticks(0);
        assert_eq!(delay.timer().0.get(), 500);
    }
}
