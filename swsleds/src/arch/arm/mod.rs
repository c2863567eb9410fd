//! ARMv7-A (Cortex-A9) support.

pub mod boot;
pub mod exception;

pub use exception::ArmExceptionGate;
