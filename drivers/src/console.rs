//! `log` backend writing to a serial port.

use core::fmt::Write;

use common::arch::CurrentIrq;
use common::sync::IrqMutex;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::hal::serial::{SerialPort, SerialWriter};

/// Logger that formats each record as `[LEVEL] target: message` on its
/// own line.
///
/// The port sits behind an [`IrqMutex`], so a record emitted from an
/// interrupt handler cannot deadlock against one being written from
/// thread context. A record emitted while the port is already held on
/// this core (a panic inside a write) is dropped.
pub struct ConsoleLogger<S> {
    port: IrqMutex<S, CurrentIrq>,
    level: LevelFilter,
}

impl<S: SerialPort> ConsoleLogger<S> {
    pub const fn new(port: S, level: LevelFilter) -> Self {
        Self {
            port: IrqMutex::new(port),
            level,
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Run `f` with exclusive access to the underlying port.
    pub fn with_port<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.port.lock())
    }
}

impl<S: SerialPort + Send> Log for ConsoleLogger<S> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let Some(mut port) = self.port.try_lock() else {
            return;
        };
        let _ = writeln!(
            SerialWriter(&mut *port),
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        if let Some(mut port) = self.port.try_lock() {
            let _ = port.flush();
        }
    }
}

/// Install `logger` as the global `log` backend.
///
/// Fails if a logger is already installed.
pub fn init<S: SerialPort + Send>(logger: &'static ConsoleLogger<S>) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}
