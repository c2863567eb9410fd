//! Cadence UART Driver (Zynq-7000 PS UART0/1)
//!
//! Transmit only. The boot firmware has already programmed the baud rate
//! and frame format, so the driver just feeds the TX FIFO.

use crate::hal::serial::{SerialError, SerialPort};
use core::ptr::{read_volatile, write_volatile};

// Register offsets
const SR_OFFSET: usize = 0x2C;
const FIFO_OFFSET: usize = 0x30;

// Channel status register bits
const SR_TXEMPTY: u32 = 1 << 3;
const SR_TXFULL: u32 = 1 << 4;

/// Cadence UART driver.
#[derive(Debug)]
pub struct CadenceUart {
    base: usize,
}

impl CadenceUart {
    /// # Safety
    ///
    /// - `base` must point to a Cadence UART register block
    /// - Only one instance should exist per UART hardware
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Queue one byte without waiting.
    pub fn try_write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        if self.read_reg(SR_OFFSET) & SR_TXFULL != 0 {
            return Err(SerialError::WouldBlock);
        }
        self.write_reg(FIFO_OFFSET, byte as u32);
        Ok(())
    }
}

impl SerialPort for CadenceUart {
    type Error = SerialError;

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        while self.read_reg(SR_OFFSET) & SR_TXFULL != 0 {
            core::hint::spin_loop();
        }
        self.write_reg(FIFO_OFFSET, byte as u32);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        while self.read_reg(SR_OFFSET) & SR_TXEMPTY == 0 {
            core::hint::spin_loop();
        }
        Ok(())
    }
}
