//! GPIO edge interrupt registers
//!
//! The GPIO block has one flag register and one enable register per
//! edge direction, each 32 bits wide (one bit per GPIO line).

/// Edge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high transition
    Rising,
    /// High to low transition
    Falling,
}

impl Edge {
    /// Both edges, rising first
    pub const ALL: [Edge; 2] = [Edge::Rising, Edge::Falling];
}

/// GPIO edge flag and enable registers
pub trait EdgeRegisters {
    /// Read the pending-flag register for `edge`
    fn pending(&self, edge: Edge) -> u32;

    /// Write the pending-flag register for `edge`
    ///
    /// Bits written as zero are cleared, bits written as one are left
    /// untouched, so writing `!bit` clears exactly one flag.
    fn write_pending(&mut self, edge: Edge, value: u32);

    /// Read the interrupt-enable register for `edge`
    fn enabled(&self, edge: Edge) -> u32;

    /// Write the interrupt-enable register for `edge`
    fn write_enabled(&mut self, edge: Edge, value: u32);

    /// Check whether any bit is enabled on either edge
    fn any_enabled(&self) -> bool {
        Edge::ALL.iter().any(|&edge| self.enabled(edge) != 0)
    }
}
