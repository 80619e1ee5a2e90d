//! Auxiliary timer register block
//!
//! One control register holds both the per-channel interrupt flags and
//! the per-channel interrupt-enable bits. Control writes only take
//! effect once committed through the apply register.

/// Auxiliary timer registers
///
/// Implementations perform the raw memory-mapped accesses; the bit
/// layout is described by the board variant, not by this trait.
pub trait TimerRegisters {
    /// Read the control/flag register
    fn control(&self) -> u32;

    /// Write the control/flag register
    fn write_control(&mut self, value: u32);

    /// Read-modify-write the control register
    fn modify_control(&mut self, f: impl FnOnce(u32) -> u32) {
        let value = self.control();
        self.write_control(f(value));
    }

    /// Commit pending writes for the registers selected by `mask`
    fn apply(&mut self, mask: u32);

    /// Program the edge-detection window of an input-capture channel
    ///
    /// # Arguments
    /// * `channel` - Input-capture channel index (0 or 1)
    /// * `start` - Window start, in raw counter units
    /// * `stop` - Window stop, in raw counter units
    fn write_icp_window(&mut self, channel: u8, start: u32, stop: u32);
}
