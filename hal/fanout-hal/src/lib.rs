//! Fanout Hardware Abstraction Layer
//!
//! This crate defines the collaborators the interrupt dispatch core
//! consumes but does not implement: the physical line registry, the
//! global interrupt-enable flag, and the register blocks of the shared
//! peripherals. Chip support crates implement these traits; the core
//! only ever talks to them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application callbacks                  │
//! └─────────────────────────────────────────┘
//!                     │ attach / detach
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fanout-core (tables, demultiplexers)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fanout-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!         │            │            │
//!         ▼            ▼            ▼
//!   line registry  timer block  GPIO edges
//! ```
//!
//! # Traits
//!
//! - [`line::InterruptControl`], [`line::LineRegistry`] - Physical lines
//! - [`timer::TimerRegisters`] - Auxiliary timer (OCP/ICP channels)
//! - [`gpio::EdgeRegisters`] - GPIO rising/falling edge flags
//! - [`counter::CycleCounter`] - Core free-running counter and compare

#![no_std]
#![deny(unsafe_code)]

pub mod counter;
pub mod gpio;
pub mod line;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use counter::CycleCounter;
pub use gpio::{Edge, EdgeRegisters};
pub use line::{InterruptControl, IrqReturn, Line, LineRegistry, ServiceRoutine, LINE_COUNT};
pub use timer::TimerRegisters;
