//! Physical interrupt lines
//!
//! A small fixed set of hardware interrupt inputs. Each line carries at
//! most one installed service routine at a time.

/// Number of physical interrupt lines
pub const LINE_COUNT: u8 = 8;

/// A physical interrupt line number (0..[`LINE_COUNT`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Line(u8);

impl Line {
    /// Create a line, or `None` if the number is out of range
    pub const fn new(number: u8) -> Option<Self> {
        if number < LINE_COUNT {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Get the line number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Get the line number as an array index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Service routines the dispatch core can install on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceRoutine {
    /// Core counter/compare interrupt
    SystemTick,
    /// Auxiliary timer, shared by 2 output-compare and 2 input-capture channels
    AuxTimer,
    /// GPIO block, shared by 32 bits x 2 edges
    GpioEdge,
}

/// Value a service routine hands back to the line registry
///
/// Every routine absorbs whatever fired on its line, spurious flags
/// included, so `Handled` is the only outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// The interrupt was serviced
    Handled,
}

/// Global interrupt-enable flag
///
/// This is the only mutual-exclusion primitive available to the core.
/// Implementations must not nest: `enable_interrupts` unconditionally
/// turns delivery back on.
pub trait InterruptControl {
    /// Mask interrupt delivery on this core
    fn disable_interrupts(&mut self);

    /// Unmask interrupt delivery on this core
    fn enable_interrupts(&mut self);
}

/// Physical line registry
///
/// Installs and removes service routines on physical lines. When the
/// line fires, the registry is expected to call back into the dispatch
/// core with the installed [`ServiceRoutine`].
pub trait LineRegistry: InterruptControl {
    /// Install `routine` as the handler of `line`
    fn install(&mut self, line: Line, routine: ServiceRoutine);

    /// Remove `routine` from `line`
    fn remove(&mut self, line: Line, routine: ServiceRoutine);
}
