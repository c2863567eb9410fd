pub mod irq;
pub mod irq_mutex;
pub use irq_mutex::IrqMutex;
