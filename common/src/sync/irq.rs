use core::fmt::Debug;

/// Masking of the IRQ exception at the CPU.
///
/// `disable` hands back whatever `restore` needs to put the previous state
/// back, so critical sections nest: an inner section that found IRQs
/// already masked leaves them masked on exit.
pub trait IrqControl {
    type State: Copy + Debug;

    fn disable() -> Self::State;

    fn restore(state: Self::State);

    /// Run `f` with IRQs masked.
    fn masked<R>(f: impl FnOnce() -> R) -> R {
        let state = Self::disable();
        let result = f();
        Self::restore(state);
        result
    }
}
