//! Auxiliary timer demultiplexer
//!
//! Two output-compare and two input-capture channels share one line and
//! one control register.

use fanout_hal::{IrqReturn, TimerRegisters};

use crate::callback::CallbackTable;
use crate::config::TimerLayout;
use crate::source::TimerChannel;

/// Service the auxiliary timer line
///
/// Scans slots 3 down to 0 (input-capture before output-compare). A
/// pending flag is cleared with a read-modify-write that drops only its
/// own bit, then the channel callback runs if one is registered. A flag
/// with no callback is still cleared, so a stray event cannot storm.
pub fn service_timer<T: TimerRegisters>(
    regs: &mut T,
    layout: &TimerLayout,
    callbacks: &CallbackTable,
) -> IrqReturn {
    for &channel in TimerChannel::ALL.iter().rev() {
        let flag = layout.flag(channel);
        if regs.control() & flag == 0 {
            continue;
        }

        regs.modify_control(|control| control & !flag);

        match callbacks.timer(channel) {
            Some(callback) => callback.call(),
            None => trace!("spurious timer flag on slot {}", channel.slot()),
        }
    }

    IrqReturn::Handled
}
