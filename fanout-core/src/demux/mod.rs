//! Demultiplexers
//!
//! Service routines for the shared physical lines. Each one works out
//! which logical sources fired, clears their flags and runs their
//! callbacks.
//!
//! All of them clear a flag *before* running its callback: a re-trigger
//! during the callback sets the flag again and is serviced next time
//! instead of being lost or counted twice.

pub mod edge;
pub mod tick;
pub mod timer;

pub use edge::service_edges;
pub use tick::TickState;
pub use timer::service_timer;
