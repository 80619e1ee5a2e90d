//! Board variant configuration
//!
//! Describes the board's static pin-to-resource table, the bit layout of
//! the auxiliary timer control register, and which physical line each
//! shared peripheral is wired to. Validated once when the dispatch
//! runtime is constructed.

pub mod timer;
pub mod variant;

use core::fmt;

pub use timer::{IcpControl, OcpControl, TimerLayout};
pub use variant::{BoardVariant, LineAssignment, LineConfig, MAX_PINS};

/// Errors found while validating a board variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line number is not a valid physical line
    InvalidLine,
    /// Two shared peripherals are wired to the same line
    LineConflict,
    /// Default tick interval is zero
    ZeroTickInterval,
    /// More than one pin is tick-designated
    MultipleTickPins,
    /// Timer flag or enable masks are empty or overlap
    TimerMask,
    /// GPIO bit is not below 32
    InvalidGpioBit,
    /// Timer channel index is not 0 or 1
    InvalidChannel,
    /// Pin table is full
    TooManyPins,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::InvalidLine => "invalid interrupt line",
            ConfigError::LineConflict => "interrupt line assigned twice",
            ConfigError::ZeroTickInterval => "tick interval must be non-zero",
            ConfigError::MultipleTickPins => "more than one tick-designated pin",
            ConfigError::TimerMask => "timer flag/enable masks empty or overlapping",
            ConfigError::InvalidGpioBit => "GPIO bit out of range",
            ConfigError::InvalidChannel => "timer channel index out of range",
            ConfigError::TooManyPins => "pin table full",
        };
        f.write_str(msg)
    }
}
