//! Cortex-A9 MPCore Global Timer Driver
//!
//! A 64-bit up-counter shared by both cores, clocked from the private
//! peripheral clock (half the CPU clock). Only the free-running counter is
//! used; the comparator stays disabled.

use crate::hal::timer::CountingTimer;
use core::ptr::{read_volatile, write_volatile};

// Register offsets
const COUNTER_LO_OFFSET: usize = 0x00;
const COUNTER_HI_OFFSET: usize = 0x04;
const CONTROL_OFFSET: usize = 0x08;

const CONTROL_TIMER_ENABLE: u32 = 1 << 0;

/// Global timer driver.
#[derive(Debug)]
pub struct GlobalTimer {
    base: usize,
    clock_hz: u32,
}

impl GlobalTimer {
    /// Create a driver for the timer at `base`, counting at `clock_hz`.
    ///
    /// # Safety
    ///
    /// `base` must point to the global timer register block.
    /// A `clock_hz` of zero is treated as 1 Hz.
    pub const unsafe fn new(base: usize, clock_hz: u32) -> Self {
        Self {
            base,
            clock_hz: if clock_hz == 0 { 1 } else { clock_hz },
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

    /// Start the counter if the boot firmware left it stopped.
    pub fn start(&mut self) {
        let control = self.read_reg(CONTROL_OFFSET);
        if control & CONTROL_TIMER_ENABLE == 0 {
            self.write_reg(CONTROL_OFFSET, control | CONTROL_TIMER_ENABLE);
        }
    }

    /// Read the raw 64-bit counter.
    pub fn read_counter(&self) -> u64 {
        loop {
            let hi = self.read_reg(COUNTER_HI_OFFSET);
            let lo = self.read_reg(COUNTER_LO_OFFSET);
            // Retry if the low word wrapped between the two reads
            if self.read_reg(COUNTER_HI_OFFSET) == hi {
                return ((hi as u64) << 32) | lo as u64;
            }
        }
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    /// Convert counter ticks to whole microseconds, rounding down.
    ///
    /// Never reports more time than has passed, even when the clock is not
    /// a whole number of MHz.
    pub fn ticks_to_us(&self, ticks: u64) -> u64 {
        (ticks as u128 * 1_000_000 / self.clock_hz as u128) as u64
    }
}

impl CountingTimer for GlobalTimer {
    fn now_us(&self) -> u64 {
        self.ticks_to_us(self.read_counter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_CLOCK_HZ: u32 = 333_333_333;

    fn timer_at(regs: &mut [u32; 3], counter: u64) -> GlobalTimer {
        regs[COUNTER_LO_OFFSET / 4] = counter as u32;
        regs[COUNTER_HI_OFFSET / 4] = (counter >> 32) as u32;
        unsafe { GlobalTimer::new(regs.as_mut_ptr() as usize, BOARD_CLOCK_HZ) }
    }

    #[test]
    fn counter_combines_words_and_scales() {
        let mut regs = [0u32; 3];
        let timer = timer_at(&mut regs, 0x1_0000_0010);

        assert_eq!(timer.read_counter(), 0x1_0000_0010);
        // 4294967312 ticks at 333.333333 MHz.
        assert_eq!(timer.now_us(), 12_884_901);
    }

    #[test]
    fn never_runs_ahead_of_the_board_clock() {
        let mut regs = [0u32; 3];
        // 99.9 ms of real time.
        let timer = timer_at(&mut regs, 33_300_000);
        assert!(timer.now_us() < 100_000, "reported {} us", timer.now_us());
        assert_eq!(timer.now_us(), 99_900);

        // One tick short of 100 ms is still short of it.
        let timer = timer_at(&mut regs, 33_333_333 - 1);
        assert_eq!(timer.now_us(), 99_999);

        let timer = timer_at(&mut regs, 33_333_334);
        assert_eq!(timer.now_us(), 100_000);
    }

    #[test]
    fn scaling_does_not_overflow_near_wrap() {
        let mut regs = [0u32; 3];
        let timer = timer_at(&mut regs, u64::MAX);
        assert_eq!(timer.now_us(), (u64::MAX as u128 * 1_000_000 / 333_333_333) as u64);
    }

    #[test]
    fn start_sets_enable_bit_once() {
        let mut regs = [0u32; 3];
        regs[CONTROL_OFFSET / 4] = 0b100;
        let mut timer = unsafe { GlobalTimer::new(regs.as_mut_ptr() as usize, 333_333_333) };

        timer.start();
        assert_eq!(regs[CONTROL_OFFSET / 4], 0b101);
    }
}
