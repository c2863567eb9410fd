//! Architecture selection.
//!
//! ARM builds get the real CPSR manipulation. Every other target (host
//! test builds) gets no-op stand-ins so the same code paths can be
//! exercised off-target.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        pub mod arm;
        pub use arm::cpu::{disable_irq, dsb, enable_irq, wait_for_interrupt};
        pub use arm::irq::ArmIrq as CurrentIrq;
    } else {
        pub mod host;
        pub use host::{disable_irq, dsb, enable_irq, wait_for_interrupt};
        pub use host::HostIrq as CurrentIrq;
    }
}
