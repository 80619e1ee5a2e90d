//! Callback slots
//!
//! One optional callback per logical source. The table has no locking of
//! its own: callers bracket mutation with an [`InterruptGuard`] so a
//! demultiplexer never observes a half-written slot.
//!
//! [`InterruptGuard`]: crate::guard::InterruptGuard

use core::fmt;

use crate::source::{Edge, GpioBit, LogicalSource, TimerChannel, GPIO_BITS, TIMER_CHANNELS};

/// Zero-argument interrupt callback
///
/// Runs synchronously in interrupt context, so it must not block or
/// allocate.
#[derive(Clone, Copy)]
pub struct Callback(Target);

#[derive(Clone, Copy)]
enum Target {
    Plain(fn()),
    Shared(&'static (dyn Fn() + Sync)),
}

impl Callback {
    /// Wrap a plain function
    pub const fn from_fn(f: fn()) -> Self {
        Self(Target::Plain(f))
    }

    /// Wrap a statically allocated closure
    pub const fn new(f: &'static (dyn Fn() + Sync)) -> Self {
        Self(Target::Shared(f))
    }

    /// Invoke the callback
    #[inline]
    pub fn call(&self) {
        match self.0 {
            Target::Plain(f) => f(),
            Target::Shared(f) => f(),
        }
    }
}

impl From<fn()> for Callback {
    fn from(f: fn()) -> Self {
        Self::from_fn(f)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Target::Plain(func) => write!(f, "Callback({:p})", func),
            Target::Shared(_) => f.write_str("Callback(<closure>)"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Callback {
    fn format(&self, f: defmt::Formatter) {
        match self.0 {
            Target::Plain(_) => defmt::write!(f, "Callback(fn)"),
            Target::Shared(_) => defmt::write!(f, "Callback(closure)"),
        }
    }
}

/// Per-source callback storage
///
/// `set` and `clear` are the only mutators, both with overwrite
/// semantics: setting a set slot replaces it, clearing a clear slot is a
/// no-op.
#[derive(Debug, Clone)]
pub struct CallbackTable {
    tick: Option<Callback>,
    timer: [Option<Callback>; TIMER_CHANNELS],
    rising: [Option<Callback>; GPIO_BITS as usize],
    falling: [Option<Callback>; GPIO_BITS as usize],
}

impl Default for CallbackTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            tick: None,
            timer: [None; TIMER_CHANNELS],
            rising: [None; GPIO_BITS as usize],
            falling: [None; GPIO_BITS as usize],
        }
    }

    /// Store `callback` for `source`, replacing any previous one
    pub fn set(&mut self, source: LogicalSource, callback: Callback) {
        *self.slot_mut(source) = Some(callback);
    }

    /// Empty the slot for `source`
    pub fn clear(&mut self, source: LogicalSource) {
        *self.slot_mut(source) = None;
    }

    /// Get the callback for `source`
    pub fn get(&self, source: LogicalSource) -> Option<Callback> {
        match source {
            LogicalSource::DigitalEdge { bit, edge } => self.edge(bit, edge),
            LogicalSource::Timer(channel) => self.timer(channel),
            LogicalSource::SystemTick => self.tick,
        }
    }

    /// Check whether `source` has a callback
    pub fn is_set(&self, source: LogicalSource) -> bool {
        self.get(source).is_some()
    }

    /// Check whether every slot is empty
    pub fn is_empty(&self) -> bool {
        self.tick.is_none()
            && self.timer.iter().all(Option::is_none)
            && self.rising.iter().all(Option::is_none)
            && self.falling.iter().all(Option::is_none)
    }

    pub(crate) fn timer(&self, channel: TimerChannel) -> Option<Callback> {
        self.timer[channel.slot()]
    }

    pub(crate) fn edge(&self, bit: GpioBit, edge: Edge) -> Option<Callback> {
        let bits = match edge {
            Edge::Rising => &self.rising,
            Edge::Falling => &self.falling,
        };
        bits[bit.position() as usize]
    }

    fn slot_mut(&mut self, source: LogicalSource) -> &mut Option<Callback> {
        match source {
            LogicalSource::DigitalEdge { bit, edge } => {
                let bits = match edge {
                    Edge::Rising => &mut self.rising,
                    Edge::Falling => &mut self.falling,
                };
                &mut bits[bit.position() as usize]
            }
            LogicalSource::Timer(channel) => &mut self.timer[channel.slot()],
            LogicalSource::SystemTick => &mut self.tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelIndex;
    use portable_atomic::{AtomicU32, Ordering};

    static FIRST: AtomicU32 = AtomicU32::new(0);
    static SECOND: AtomicU32 = AtomicU32::new(0);

    fn first() {
        FIRST.fetch_add(1, Ordering::Relaxed);
    }

    fn second() {
        SECOND.fetch_add(1, Ordering::Relaxed);
    }

    fn rising(bit: u8) -> LogicalSource {
        LogicalSource::DigitalEdge {
            bit: GpioBit::new(bit).unwrap(),
            edge: Edge::Rising,
        }
    }

    #[test]
    fn test_empty_table() {
        let table = CallbackTable::new();
        assert!(table.is_empty());
        assert!(table.get(LogicalSource::SystemTick).is_none());
        assert!(table.get(rising(31)).is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut table = CallbackTable::new();
        let source = LogicalSource::Timer(TimerChannel::output_compare(ChannelIndex::Second));

        table.set(source, Callback::from_fn(first));
        table.set(source, Callback::from_fn(second));

        let before = FIRST.load(Ordering::Relaxed);
        table.get(source).unwrap().call();
        assert_eq!(FIRST.load(Ordering::Relaxed), before);
        assert!(SECOND.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut table = CallbackTable::new();
        table.set(rising(5), Callback::from_fn(first));
        assert!(table.is_set(rising(5)));

        table.clear(rising(5));
        table.clear(rising(5));
        assert!(!table.is_set(rising(5)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_edges_are_independent() {
        let mut table = CallbackTable::new();
        let bit = GpioBit::new(5).unwrap();
        table.set(rising(5), Callback::from_fn(first));

        assert!(table.edge(bit, Edge::Rising).is_some());
        assert!(table.edge(bit, Edge::Falling).is_none());
        assert!(table.get(rising(4)).is_none());
    }
}
