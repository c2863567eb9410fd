//! ARM Generic Interrupt Controller (GICv1 / PL390) Driver
//!
//! The GIC is split into a distributor, which holds per-line enable,
//! priority, target and trigger configuration, and a per-CPU interface,
//! through which the core acknowledges and completes interrupts.
//!
//! Line numbering:
//! - 0..=15: software generated interrupts (SGI)
//! - 16..=31: private peripheral interrupts (PPI)
//! - 32..: shared peripheral interrupts (SPI), the fabric lines among them
//!
//! The driver also owns the handler table consulted by
//! [`dispatch_pending`](crate::hal::interrupt::dispatch_pending).

use crate::DeviceId;
use crate::hal::interrupt::{
    ConfigurableInterruptController, HandlerRegistry, InterruptController, IrqHandler, IrqNumber,
    Priority, PriorityInterruptController, TriggerMode,
};
use core::ptr::{read_volatile, write_volatile};

/// Number of interrupt lines the handler table covers.
pub const MAX_IRQS: usize = 96;

/// First shared peripheral interrupt.
pub const FIRST_SPI: IrqNumber = 32;

/// Priority given to every SPI at initialisation.
pub const DEFAULT_PRIORITY: Priority = 0xA0;

/// CPU interface priority mask: lines at 0xF0 and above are never signalled.
pub const PRIORITY_MASK: u32 = 0xF0;

/// Only the top five priority bits are implemented.
const PRIORITY_IMPLEMENTED: Priority = 0xF8;

/// Interrupt IDs at and above this value are spurious.
const SPURIOUS_ID: u32 = 1020;
const INTERRUPT_ID_MASK: u32 = 0x3FF;

// Distributor register offsets
const ICDDCR: usize = 0x000;
const ICDISER: usize = 0x100;
const ICDICER: usize = 0x180;
const ICDISPR: usize = 0x200;
const ICDIPR: usize = 0x400;
const ICDIPTR: usize = 0x800;
const ICDICFR: usize = 0xC00;

// CPU interface register offsets
const ICCICR: usize = 0x00;
const ICCPMR: usize = 0x04;
const ICCIAR: usize = 0x0C;
const ICCEOIR: usize = 0x10;

const DIST_ENABLE: u32 = 1 << 0;
const CPU_ENABLE: u32 = 1 << 0;

/// Target every SPI at CPU0.
const CPU0_TARGET: u32 = 0x01;

/// Two-bit trigger configuration field values, in the form the Xilinx
/// tooling writes them (high bit set = edge sensitive).
const CFG_LEVEL_HIGH: u32 = 0b01;
const CFG_RISING_EDGE: u32 = 0b11;

/// Base addresses of one GIC instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GicConfig {
    pub device_id: DeviceId,
    pub dist_base: usize,
    pub cpu_base: usize,
}

/// GIC errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GicError {
    /// No controller with this device id exists.
    DeviceNotFound(DeviceId),
    /// Line number outside the handler table.
    InvalidIrq(IrqNumber),
    /// The line already has a handler.
    AlreadyConnected(IrqNumber),
    /// SPIs only support rising-edge and active-high triggers.
    UnsupportedTrigger(TriggerMode),
}

/// Register and bit position of a line's priority byte.
pub const fn priority_field(irq: IrqNumber) -> (usize, u32) {
    (ICDIPR + (irq as usize / 4) * 4, (irq % 4) * 8)
}

/// Register and bit position of a line's target byte.
pub const fn target_field(irq: IrqNumber) -> (usize, u32) {
    (ICDIPTR + (irq as usize / 4) * 4, (irq % 4) * 8)
}

/// Register and bit position of a line's two-bit trigger field.
pub const fn config_field(irq: IrqNumber) -> (usize, u32) {
    (ICDICFR + (irq as usize / 16) * 4, (irq % 16) * 2)
}

/// Word offset and bit for the one-bit-per-line banks (enable, pending).
pub const fn bit_field(bank: usize, irq: IrqNumber) -> (usize, u32) {
    (bank + (irq as usize / 32) * 4, 1 << (irq % 32))
}

/// GIC driver.
pub struct Gic {
    dist_base: usize,
    cpu_base: usize,
    handlers: [Option<&'static dyn IrqHandler>; MAX_IRQS],
}

impl Gic {
    /// Create a driver for the controller described by `config`.
    ///
    /// The hardware is left untouched until [`init`](Self::init).
    ///
    /// # Safety
    ///
    /// - Both base addresses must point to the GIC register blocks
    /// - Only one instance should exist per controller
    pub const unsafe fn new(config: &GicConfig) -> Self {
        Self {
            dist_base: config.dist_base,
            cpu_base: config.cpu_base,
            handlers: [None; MAX_IRQS],
        }
    }

    #[inline]
    fn read_dist(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.dist_base + offset) as *const u32) }
    }

    #[inline]
    fn write_dist(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.dist_base + offset) as *mut u32, value) }
    }

    #[inline]
    fn read_cpu(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.cpu_base + offset) as *const u32) }
    }

    #[inline]
    fn write_cpu(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.cpu_base + offset) as *mut u32, value) }
    }

    fn update_field(&mut self, (offset, shift): (usize, u32), width_mask: u32, value: u32) {
        let reg = self.read_dist(offset);
        let reg = (reg & !(width_mask << shift)) | ((value & width_mask) << shift);
        self.write_dist(offset, reg);
    }

    fn check_irq(irq: IrqNumber) -> Result<(), GicError> {
        if (irq as usize) < MAX_IRQS {
            Ok(())
        } else {
            Err(GicError::InvalidIrq(irq))
        }
    }

    /// Bring the controller into a known state.
    ///
    /// Every SPI is disabled, targeted at CPU0, level sensitive and at
    /// [`DEFAULT_PRIORITY`]. Distributor and CPU interface are then
    /// enabled with [`PRIORITY_MASK`].
    pub fn init(&mut self) {
        self.write_dist(ICDDCR, 0);

        for irq in FIRST_SPI..MAX_IRQS as IrqNumber {
            let (offset, bit) = bit_field(ICDICER, irq);
            self.write_dist(offset, bit);
            self.update_field(priority_field(irq), 0xFF, DEFAULT_PRIORITY as u32);
            self.update_field(target_field(irq), 0xFF, CPU0_TARGET);
            self.update_field(config_field(irq), 0b11, CFG_LEVEL_HIGH);
        }

        self.write_dist(ICDDCR, DIST_ENABLE);

        self.write_cpu(ICCPMR, PRIORITY_MASK);
        self.write_cpu(ICCICR, CPU_ENABLE);
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl InterruptController for Gic {
    type Error = GicError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        Self::check_irq(irq)?;
        let (offset, bit) = bit_field(ICDISER, irq);
        self.write_dist(offset, bit);
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        Self::check_irq(irq)?;
        let (offset, bit) = bit_field(ICDICER, irq);
        self.write_dist(offset, bit);
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> Result<bool, Self::Error> {
        Self::check_irq(irq)?;
        let (offset, bit) = bit_field(ICDISPR, irq);
        Ok(self.read_dist(offset) & bit != 0)
    }

    fn acknowledge(&mut self) -> Option<IrqNumber> {
        let id = self.read_cpu(ICCIAR) & INTERRUPT_ID_MASK;
        (id < SPURIOUS_ID).then_some(id)
    }

    fn end_of_interrupt(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        self.write_cpu(ICCEOIR, irq & INTERRUPT_ID_MASK);
        Ok(())
    }
}

impl PriorityInterruptController for Gic {
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), Self::Error> {
        Self::check_irq(irq)?;
        self.update_field(
            priority_field(irq),
            0xFF,
            (priority & PRIORITY_IMPLEMENTED) as u32,
        );
        Ok(())
    }

    fn get_priority(&self, irq: IrqNumber) -> Result<Priority, Self::Error> {
        Self::check_irq(irq)?;
        let (offset, shift) = priority_field(irq);
        Ok((self.read_dist(offset) >> shift) as Priority)
    }
}

impl ConfigurableInterruptController for Gic {
    fn configure_trigger(&mut self, irq: IrqNumber, mode: TriggerMode) -> Result<(), Self::Error> {
        Self::check_irq(irq)?;
        let cfg = match mode {
            TriggerMode::RisingEdge => CFG_RISING_EDGE,
            TriggerMode::LevelHigh => CFG_LEVEL_HIGH,
            TriggerMode::FallingEdge | TriggerMode::LevelLow => {
                return Err(GicError::UnsupportedTrigger(mode));
            }
        };
        self.update_field(config_field(irq), 0b11, cfg);
        Ok(())
    }
}

impl HandlerRegistry for Gic {
    fn connect(
        &mut self,
        irq: IrqNumber,
        handler: &'static dyn IrqHandler,
    ) -> Result<(), Self::Error> {
        Self::check_irq(irq)?;
        let slot = &mut self.handlers[irq as usize];
        if slot.is_some() {
            return Err(GicError::AlreadyConnected(irq));
        }
        *slot = Some(handler);
        Ok(())
    }

    fn disconnect(&mut self, irq: IrqNumber) {
        if let Some(slot) = self.handlers.get_mut(irq as usize) {
            *slot = None;
        }
    }

    fn handler(&self, irq: IrqNumber) -> Option<&'static dyn IrqHandler> {
        self.handlers.get(irq as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIST_WORDS: usize = ICDICFR / 4 + MAX_IRQS / 16;

    struct Regs {
        dist: [u32; DIST_WORDS],
        cpu: [u32; ICCEOIR / 4 + 1],
    }

    impl Regs {
        fn new() -> Self {
            Self {
                dist: [0; DIST_WORDS],
                cpu: [0; ICCEOIR / 4 + 1],
            }
        }

        fn gic(&mut self) -> Gic {
            let config = GicConfig {
                device_id: 0,
                dist_base: self.dist.as_mut_ptr() as usize,
                cpu_base: self.cpu.as_mut_ptr() as usize,
            };
            unsafe { Gic::new(&config) }
        }
    }

    struct Nop;

    impl IrqHandler for Nop {
        fn handle(&self, _irq: IrqNumber) {}
    }

    static NOP: Nop = Nop;

    #[test]
    fn field_math_for_fabric_line() {
        // IRQ 61: priority byte 1 of ICDIPR15, trigger bits 27:26 of ICDICFR3.
        assert_eq!(priority_field(61), (ICDIPR + 60, 8));
        assert_eq!(config_field(61), (ICDICFR + 12, 26));
        assert_eq!(bit_field(ICDISER, 61), (ICDISER + 4, 1 << 29));
    }

    #[test]
    fn priority_trigger_for_fabric_line() {
        let mut regs = Regs::new();
        let mut gic = regs.gic();

        gic.set_priority_trigger(61, 0xA0, TriggerMode::RisingEdge)
            .unwrap();

        assert_eq!(gic.get_priority(61), Ok(0xA0));
        assert_eq!(regs.dist[(ICDICFR + 12) / 4] >> 26 & 0b11, CFG_RISING_EDGE);
    }

    #[test]
    fn priority_keeps_neighbouring_lines() {
        let mut regs = Regs::new();
        let mut gic = regs.gic();

        gic.set_priority(60, 0x10).unwrap();
        gic.set_priority(61, 0xA7).unwrap();

        assert_eq!(gic.get_priority(60), Ok(0x10));
        // Low three bits are not implemented.
        assert_eq!(gic.get_priority(61), Ok(0xA0));
    }

    #[test]
    fn falling_edge_is_rejected() {
        let mut regs = Regs::new();
        let mut gic = regs.gic();

        assert_eq!(
            gic.configure_trigger(61, TriggerMode::FallingEdge),
            Err(GicError::UnsupportedTrigger(TriggerMode::FallingEdge))
        );
    }

    #[test]
    fn handler_table() {
        let mut regs = Regs::new();
        let mut gic = regs.gic();

        assert_eq!(gic.connect(61, &NOP), Ok(()));
        assert_eq!(gic.connect(61, &NOP), Err(GicError::AlreadyConnected(61)));
        assert_eq!(
            gic.connect(MAX_IRQS as IrqNumber, &NOP),
            Err(GicError::InvalidIrq(MAX_IRQS as IrqNumber))
        );
        assert!(gic.handler(61).is_some());

        gic.disconnect(61);
        assert!(gic.handler(61).is_none());
        assert_eq!(gic.connect(61, &NOP), Ok(()));
    }

    #[test]
    fn spurious_acknowledge() {
        let mut regs = Regs::new();
        regs.cpu[ICCIAR / 4] = 1023;
        let mut gic = regs.gic();
        assert_eq!(gic.acknowledge(), None);

        regs.cpu[ICCIAR / 4] = 61;
        let mut gic = regs.gic();
        assert_eq!(gic.acknowledge(), Some(61));
    }

    #[test]
    fn init_routes_spis_to_cpu0_and_enables() {
        let mut regs = Regs::new();
        let mut gic = regs.gic();
        gic.init();

        let (offset, shift) = target_field(61);
        assert_eq!(regs.dist[offset / 4] >> shift & 0xFF, CPU0_TARGET);
        assert_eq!(regs.dist[ICDDCR / 4], DIST_ENABLE);
        assert_eq!(regs.cpu[ICCPMR / 4], PRIORITY_MASK);
        assert_eq!(regs.cpu[ICCICR / 4], CPU_ENABLE);
    }
}
