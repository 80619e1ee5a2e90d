//! Board-agnostic interrupt dispatch core
//!
//! Fans a handful of shared physical interrupt lines out to per-source
//! callbacks:
//!
//! - Callback table (one slot per logical source)
//! - Demultiplexers for the auxiliary timer, GPIO edge block and system tick
//! - Attach/detach protocol with lazy install and removal of service routines
//! - Input-capture filter window programming
//! - Board variant configuration types
//!
//! Hardware access goes through the traits in `fanout-hal`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod callback;
pub mod config;
pub mod demux;
pub mod guard;
pub mod mux;
pub mod pins;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use callback::{Callback, CallbackTable};
pub use config::{BoardVariant, ConfigError};
pub use guard::InterruptGuard;
pub use mux::{InterruptMux, Peripherals};
pub use pins::{PinDescriptor, PinError};
pub use source::{ChannelIndex, ChannelKind, GpioBit, LogicalSource, Mode, TimerChannel};

pub use fanout_hal::{Edge, IrqReturn, Line, ServiceRoutine};
