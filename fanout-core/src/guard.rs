//! Interrupt-masking scope guard
//!
//! Acquiring the guard disables interrupt delivery; dropping it enables
//! delivery again, on every exit path. Any update that pairs a callback
//! slot with its hardware enable bit happens inside one guard.

use core::ops::{Deref, DerefMut};

use fanout_hal::InterruptControl;

/// RAII interrupt mask
///
/// Derefs to the wrapped controller so line install/remove calls can be
/// made inside the masked window.
///
/// ```ignore
/// {
///     let mut guard = InterruptGuard::new(&mut registry);
///     guard.install(line, ServiceRoutine::GpioEdge);
/// } // interrupts enabled again here
/// ```
pub struct InterruptGuard<'r, R: InterruptControl + ?Sized> {
    control: &'r mut R,
}

impl<'r, R: InterruptControl + ?Sized> InterruptGuard<'r, R> {
    /// Disable interrupts and return the guard
    pub fn new(control: &'r mut R) -> Self {
        control.disable_interrupts();
        Self { control }
    }
}

impl<R: InterruptControl + ?Sized> Deref for InterruptGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.control
    }
}

impl<R: InterruptControl + ?Sized> DerefMut for InterruptGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.control
    }
}

impl<R: InterruptControl + ?Sized> Drop for InterruptGuard<'_, R> {
    fn drop(&mut self) {
        self.control.enable_interrupts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Flag {
        enabled: bool,
        disables: u32,
        enables: u32,
    }

    impl InterruptControl for Flag {
        fn disable_interrupts(&mut self) {
            self.enabled = false;
            self.disables += 1;
        }

        fn enable_interrupts(&mut self) {
            self.enabled = true;
            self.enables += 1;
        }
    }

    fn early_return(flag: &mut Flag, bail: bool) -> Option<()> {
        let guard = InterruptGuard::new(flag);
        assert!(!guard.enabled);
        if bail {
            return None;
        }
        Some(())
    }

    #[test]
    fn test_guard_masks_for_scope() {
        let mut flag = Flag {
            enabled: true,
            ..Flag::default()
        };

        {
            let guard = InterruptGuard::new(&mut flag);
            assert!(!guard.enabled);
        }

        assert!(flag.enabled);
        assert_eq!(flag.disables, 1);
        assert_eq!(flag.enables, 1);
    }

    #[test]
    fn test_guard_reenables_on_early_return() {
        let mut flag = Flag::default();

        assert!(early_return(&mut flag, true).is_none());
        assert!(flag.enabled);

        assert!(early_return(&mut flag, false).is_some());
        assert!(flag.enabled);
        assert_eq!(flag.disables, 2);
        assert_eq!(flag.enables, 2);
    }
}
