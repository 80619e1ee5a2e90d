//! Core free-running counter
//!
//! A 32-bit counter that wraps, with a single compare register that
//! raises the system tick interrupt on match.

/// Free-running cycle counter with compare
pub trait CycleCounter {
    /// Read the current counter value
    fn count(&self) -> u32;

    /// Program the compare register
    fn set_compare(&mut self, value: u32);
}
