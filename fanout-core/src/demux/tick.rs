//! System tick service
//!
//! The core counter runs free; each tick moves the compare point forward
//! by one interval from the *previous* target, never from the current
//! count. Ticks therefore stay on a fixed grid from the arming point no
//! matter how late the service routine runs.

use fanout_hal::{CycleCounter, IrqReturn};
use portable_atomic::{AtomicU32, Ordering};

use crate::callback::CallbackTable;
use crate::source::LogicalSource;

/// Compare target and accumulation interval
#[derive(Debug)]
pub struct TickState {
    /// Compare value currently programmed
    next: u32,
    /// Interval in counter units; may be replaced while the tick runs
    interval: AtomicU32,
}

impl TickState {
    /// Create a disarmed tick with the given interval
    pub const fn new(interval: u32) -> Self {
        Self {
            next: 0,
            interval: AtomicU32::new(interval),
        }
    }

    /// Current interval
    pub fn interval(&self) -> u32 {
        self.interval.load(Ordering::Relaxed)
    }

    /// Replace the interval
    ///
    /// Takes effect from the next rearm. Not synchronized with a tick in
    /// progress.
    pub fn set_interval(&self, interval: u32) {
        self.interval.store(interval, Ordering::Relaxed);
    }

    /// Compare value currently programmed
    pub fn next(&self) -> u32 {
        self.next
    }

    /// Program the first compare point, one interval from now
    pub fn arm<C: CycleCounter>(&mut self, counter: &mut C) {
        self.next = counter.count().wrapping_add(self.interval());
        counter.set_compare(self.next);
    }

    /// Service the tick line
    ///
    /// Runs the callback, then advances the compare point by one
    /// interval. With no callback registered the compare register is
    /// left alone.
    pub fn service<C: CycleCounter>(
        &mut self,
        counter: &mut C,
        callbacks: &CallbackTable,
    ) -> IrqReturn {
        match callbacks.get(LogicalSource::SystemTick) {
            Some(callback) => {
                callback.call();
                self.next = self.next.wrapping_add(self.interval());
                counter.set_compare(self.next);
            }
            None => trace!("tick with no callback"),
        }

        IrqReturn::Handled
    }
}
