//! Xilinx Zynq-7000 (ZedBoard) platform.
//!
//! Device tables follow the hardware design: one dual-channel AXI GPIO in
//! the fabric with its interrupt wired to IRQ_F2P[0], and the SCU's GIC.

use super::Platform;
use crate::DeviceId;
use crate::hal::interrupt::IrqNumber;
use crate::peripheral::axi_gpio::{AxiGpio, AxiGpioConfig, GpioError};
use crate::peripheral::cadence_uart::CadenceUart;
use crate::peripheral::gic::{Gic, GicConfig, GicError};
use crate::peripheral::global_timer::GlobalTimer;

// ============================================================================
// Address Map
// ============================================================================

pub const AXI_GPIO_0_BASE: usize = 0x4120_0000;
pub const GIC_DIST_BASE: usize = 0xF8F0_1000;
pub const GIC_CPU_BASE: usize = 0xF8F0_0100;
pub const GLOBAL_TIMER_BASE: usize = 0xF8F0_0200;
pub const UART1_BASE: usize = 0xE000_1000;

/// Global timer input clock: CPU_3x2x, half of the 666 MHz CPU clock.
pub const GLOBAL_TIMER_CLOCK_HZ: u32 = 333_333_333;

/// Fabric interrupt line of AXI GPIO 0.
pub const AXI_GPIO_0_IRQ: IrqNumber = 61;

// ============================================================================
// Device Tables
// ============================================================================

pub static AXI_GPIO_CONFIGS: [AxiGpioConfig; 1] = [AxiGpioConfig {
    device_id: 0,
    base: AXI_GPIO_0_BASE,
    interrupt_present: true,
    dual_channel: true,
}];

pub static GIC_CONFIGS: [GicConfig; 1] = [GicConfig {
    device_id: 0,
    dist_base: GIC_DIST_BASE,
    cpu_base: GIC_CPU_BASE,
}];

pub fn lookup_gpio(id: DeviceId) -> Option<&'static AxiGpioConfig> {
    AXI_GPIO_CONFIGS.iter().find(|c| c.device_id == id)
}

pub fn lookup_gic(id: DeviceId) -> Option<&'static GicConfig> {
    GIC_CONFIGS.iter().find(|c| c.device_id == id)
}

pub struct Zynq7000Platform;

impl Platform for Zynq7000Platform {
    type Gpio = AxiGpio;
    type Intc = Gic;
    type Timer = GlobalTimer;
    type Console = CadenceUart;

    fn name() -> &'static str {
        "Zynq-7000 (ZedBoard)"
    }

    unsafe fn gpio(id: DeviceId) -> Result<AxiGpio, GpioError> {
        let config = lookup_gpio(id).ok_or(GpioError::DeviceNotFound(id))?;
        Ok(unsafe { AxiGpio::new(config) })
    }

    unsafe fn interrupt_controller(id: DeviceId) -> Result<Gic, GicError> {
        let config = lookup_gic(id).ok_or(GicError::DeviceNotFound(id))?;
        let mut gic = unsafe { Gic::new(config) };
        gic.init();
        Ok(gic)
    }

    unsafe fn timer() -> GlobalTimer {
        let mut timer = unsafe { GlobalTimer::new(GLOBAL_TIMER_BASE, GLOBAL_TIMER_CLOCK_HZ) };
        timer.start();
        timer
    }

    unsafe fn console() -> CadenceUart {
        unsafe { CadenceUart::new(UART1_BASE) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_devices_are_not_found() {
        assert!(matches!(
            unsafe { Zynq7000Platform::gpio(7) },
            Err(GpioError::DeviceNotFound(7))
        ));
        assert!(matches!(
            unsafe { Zynq7000Platform::interrupt_controller(3) },
            Err(GicError::DeviceNotFound(3))
        ));
    }

    #[test]
    fn device_zero_is_the_switch_led_gpio() {
        let config = lookup_gpio(0).unwrap();
        assert_eq!(config.base, AXI_GPIO_0_BASE);
        assert!(config.interrupt_present && config.dual_channel);
    }
}
