//! GPIO edge demultiplexer
//!
//! 32 GPIO bits, each with a rising and a falling flag, share one line.

use fanout_hal::{Edge, EdgeRegisters, IrqReturn};

use crate::callback::CallbackTable;
use crate::source::{GpioBit, GPIO_BITS};

/// Service the GPIO edge line
///
/// Scans bits 31 down to 0 and checks both edges of each bit
/// independently, so a bit with both flags pending gets both callbacks
/// in one call. A flag is cleared by writing its complement to the flag
/// register before the callback runs.
pub fn service_edges<G: EdgeRegisters>(regs: &mut G, callbacks: &CallbackTable) -> IrqReturn {
    for position in (0..GPIO_BITS).rev() {
        let Some(bit) = GpioBit::new(position) else {
            continue;
        };

        for edge in Edge::ALL {
            if regs.pending(edge) & bit.mask() == 0 {
                continue;
            }

            regs.write_pending(edge, !bit.mask());

            match callbacks.edge(bit, edge) {
                Some(callback) => callback.call(),
                None => trace!("spurious {} flag on gpio bit {}", edge, position),
            }
        }
    }

    IrqReturn::Handled
}
