use core::{
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use super::irq::IrqControl;

/// IRQ-safe mutex.
///
/// - Disables interrupts on lock
/// - Spins on the inner [`spin::Mutex`] until acquired
/// - Releases the lock, then restores interrupt state on drop
///
/// Data shared between thread context and an interrupt handler must live
/// behind one of these: if thread code held a plain spinlock when the IRQ
/// fired, the handler would spin on it forever.
///
/// Not fair. Not reentrant.
pub struct IrqMutex<T, I: IrqControl> {
    inner: spin::Mutex<T>,
    _irq: PhantomData<fn() -> I>,
}

impl<T, I: IrqControl> IrqMutex<T, I> {
    /// Create a new IRQ-safe mutex.
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
            _irq: PhantomData,
        }
    }

    /// Acquire the lock with interrupts disabled.
    pub fn lock(&self) -> IrqMutexGuard<'_, T, I> {
        let irq_state = I::disable();
        let guard = self.inner.lock();

        IrqMutexGuard {
            guard: ManuallyDrop::new(guard),
            irq_state,
        }
    }

    /// Try to acquire the lock without spinning.
    ///
    /// Interrupt state is left untouched when the lock is contended.
    pub fn try_lock(&self) -> Option<IrqMutexGuard<'_, T, I>> {
        let irq_state = I::disable();
        match self.inner.try_lock() {
            Some(guard) => Some(IrqMutexGuard {
                guard: ManuallyDrop::new(guard),
                irq_state,
            }),
            None => {
                I::restore(irq_state);
                None
            }
        }
    }

    /// Consume the mutex and return the protected value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

/// Guard returned by [`IrqMutex::lock`].
///
/// Restores interrupt state on drop.
pub struct IrqMutexGuard<'a, T, I: IrqControl> {
    guard: ManuallyDrop<spin::MutexGuard<'a, T>>,
    irq_state: I::State,
}

impl<T, I: IrqControl> Deref for IrqMutexGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T, I: IrqControl> DerefMut for IrqMutexGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T, I: IrqControl> Drop for IrqMutexGuard<'_, T, I> {
    fn drop(&mut self) {
        // SAFETY: `guard` is dropped exactly once, here, and never touched
        // afterwards. The lock must be released before IRQs come back on.
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        I::restore(self.irq_state);
    }
}
