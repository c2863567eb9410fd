//! Firmware entry point.
//!
//! Build with `cargo firmware`; add `--no-default-features --features
//! irq,console` for the interrupt-driven variant.

#![no_std]
#![no_main]

mod arch;

use core::convert::Infallible;
use core::panic::PanicInfo;

use drivers::platform::{CurrentPlatform, Platform};
use spin::Once;
use swsleds::bringup::{self, exit_status};
use swsleds::config;
use swsleds::{BringUpError, SharedSwitchLeds};

type Gpio = <CurrentPlatform as Platform>::Gpio;

/// The configured device, reachable from the IRQ handler once armed.
static SWITCH_LEDS: Once<SharedSwitchLeds<Gpio>> = Once::new();

#[cfg(all(feature = "polling", feature = "irq"))]
compile_error!("Multiple adapters selected! Choose only one: polling OR irq");

cfg_if::cfg_if! {
    if #[cfg(feature = "polling")] {
        use drivers::hal::timer::TickDelay;
        use swsleds::PollingEcho;

        type Timer = <CurrentPlatform as Platform>::Timer;

        fn strategy() -> Result<PollingEcho<TickDelay<Timer>>, BringUpError> {
            let timer = unsafe { CurrentPlatform::timer() };
            Ok(PollingEcho::new(TickDelay::new(timer), config::POLL_PERIOD_TICKS))
        }
    } else if #[cfg(feature = "irq")] {
        use arch::arm::ArmExceptionGate;
        use common::arch::CurrentIrq;
        use common::sync::IrqMutex;
        use swsleds::InterruptEcho;

        type Intc = <CurrentPlatform as Platform>::Intc;

        static INTC: Once<IrqMutex<Intc, CurrentIrq>> = Once::new();

        fn strategy() -> Result<InterruptEcho<Intc, ArmExceptionGate>, BringUpError> {
            let intc = unsafe {
                bringup::open_interrupt_controller::<CurrentPlatform>(config::INTC_DEVICE_ID)
            }?;
            let intc = INTC.call_once(|| IrqMutex::new(intc));
            let gate = unsafe { ArmExceptionGate::new() };
            Ok(InterruptEcho::new(intc, gate, config::SWITCH_BINDING))
        }
    } else {
        compile_error!(
            "No adapter selected!\n\
            Use: cargo firmware\n\
            Or:  cargo firmware --no-default-features --features irq"
        );
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "console")] {
        use drivers::console::{self, ConsoleLogger};

        type Console = <CurrentPlatform as Platform>::Console;

        static LOGGER: Once<ConsoleLogger<Console>> = Once::new();

        fn init_logging() {
            let port = unsafe { CurrentPlatform::console() };
            let logger = LOGGER.call_once(|| ConsoleLogger::new(port, config::LOG_LEVEL));
            // A second logger cannot be installed; keep the first.
            let _ = console::init(logger);
        }
    } else {
        fn init_logging() {}
    }
}

fn bring_up() -> Result<Infallible, BringUpError> {
    log::info!("swsleds on {}", CurrentPlatform::name());

    let gpio = unsafe { bringup::open_gpio::<CurrentPlatform>(config::GPIO_DEVICE_ID) }?;
    let echo = bringup::configure(gpio, config::LAYOUT)?;
    let echo = SWITCH_LEDS.call_once(|| SharedSwitchLeds::new(echo));

    bringup::run(echo, strategy()?)
}

/// Called by `_start`. Only returns if bring-up fails.
#[unsafe(no_mangle)]
pub extern "C" fn swsleds_main() -> i32 {
    init_logging();
    exit_status(bring_up())
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // Dropped by the console if the panic came from inside a write.
    log::error!("panic: {}", info);
    common::arch::disable_irq();
    loop {
        common::arch::wait_for_interrupt();
    }
}
