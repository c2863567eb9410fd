//! Serial output.
//!
//! Only the transmit direction exists: the board sends diagnostics and
//! never reads anything back.

use core::fmt;

/// Errors shared by serial drivers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// The transmitter has no room and the caller asked not to wait.
    WouldBlock,
}

/// Byte sink with blocking transmit.
pub trait SerialPort {
    type Error: core::fmt::Debug;

    /// Queue one byte, waiting for transmitter space.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Queue `bytes` in order. Returns how many were queued.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        bytes.iter().try_for_each(|&b| self.write_byte(b))?;
        Ok(bytes.len())
    }

    /// Wait until every queued byte has left the transmitter.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// `core::fmt::Write` over a borrowed [`SerialPort`], turning each `\n`
/// into `\r\n` for terminal emulators.
pub struct SerialWriter<'a, T: SerialPort + ?Sized>(pub &'a mut T);

impl<T: SerialPort + ?Sized> fmt::Write for SerialWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.0.write(first.as_bytes()).map_err(|_| fmt::Error)?;
        }
        for line in lines {
            self.0.write(b"\r\n").map_err(|_| fmt::Error)?;
            self.0.write(line.as_bytes()).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
