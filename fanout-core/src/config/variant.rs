//! Board variant description
//!
//! The pin table, line wiring and default tick interval for one board.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use fanout_hal::{Line, ServiceRoutine};

use super::{ConfigError, TimerLayout};
use crate::pins::PinDescriptor;

/// Maximum pins in a variant's pin table
pub const MAX_PINS: usize = 64;

/// Raw line numbers of the shared peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineConfig {
    /// Core counter/compare line
    pub system_tick: u8,
    /// Auxiliary timer line
    pub aux_timer: u8,
    /// GPIO edge line
    pub gpio: u8,
}

/// Validated line wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineAssignment {
    /// Core counter/compare line
    pub system_tick: Line,
    /// Auxiliary timer line
    pub aux_timer: Line,
    /// GPIO edge line
    pub gpio: Line,
}

impl LineAssignment {
    /// Line that carries `routine`
    pub fn line(&self, routine: ServiceRoutine) -> Line {
        match routine {
            ServiceRoutine::SystemTick => self.system_tick,
            ServiceRoutine::AuxTimer => self.aux_timer,
            ServiceRoutine::GpioEdge => self.gpio,
        }
    }
}

impl LineConfig {
    /// Check the numbers and turn them into lines
    pub fn assign(&self) -> Result<LineAssignment, ConfigError> {
        let line = |n| Line::new(n).ok_or(ConfigError::InvalidLine);
        let assignment = LineAssignment {
            system_tick: line(self.system_tick)?,
            aux_timer: line(self.aux_timer)?,
            gpio: line(self.gpio)?,
        };

        if assignment.system_tick == assignment.aux_timer
            || assignment.system_tick == assignment.gpio
            || assignment.aux_timer == assignment.gpio
        {
            return Err(ConfigError::LineConflict);
        }

        Ok(assignment)
    }
}

/// Complete board variant
///
/// Pin ids are indexes into `pins`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardVariant {
    /// Pin table, indexed by pin id
    pub pins: Vec<PinDescriptor, MAX_PINS>,
    /// Line wiring
    pub lines: LineConfig,
    /// Auxiliary timer bit layout
    pub timer: TimerLayout,
    /// Default tick interval in counter units (the core clock rate, so
    /// one tick per second)
    pub tick_interval: u32,
}

impl BoardVariant {
    /// Create a variant with an empty pin table
    pub fn new(lines: LineConfig, timer: TimerLayout, tick_interval: u32) -> Self {
        Self {
            pins: Vec::new(),
            lines,
            timer,
            tick_interval,
        }
    }

    /// Append a pin; its id is the previous pin count
    pub fn push_pin(&mut self, pin: PinDescriptor) -> Result<(), ConfigError> {
        self.pins.push(pin).map_err(|_| ConfigError::TooManyPins)
    }

    /// Builder form of [`push_pin`](Self::push_pin) for a whole table
    pub fn with_pins(mut self, pins: &[PinDescriptor]) -> Result<Self, ConfigError> {
        for &pin in pins {
            self.push_pin(pin)?;
        }
        Ok(self)
    }

    /// Number of pins in the table
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Id of the tick-designated pin, if the board has one
    pub fn tick_pin(&self) -> Option<u32> {
        self.pins
            .iter()
            .position(|pin| pin.system_tick)
            .map(|id| id as u32)
    }

    /// Validate the variant and return its line wiring
    pub fn validate(&self) -> Result<LineAssignment, ConfigError> {
        if self.tick_interval == 0 {
            warn!("variant rejected: zero tick interval");
            return Err(ConfigError::ZeroTickInterval);
        }

        if self.pins.iter().filter(|pin| pin.system_tick).count() > 1 {
            warn!("variant rejected: multiple tick pins");
            return Err(ConfigError::MultipleTickPins);
        }

        self.timer.validate().inspect_err(|_| {
            warn!("variant rejected: bad timer masks");
        })?;

        self.lines.assign().inspect_err(|e| {
            warn!("variant rejected: {}", e);
        })
    }
}
