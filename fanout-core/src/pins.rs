//! Pin descriptors
//!
//! The board's static pin table maps a pin id to the interrupt-capable
//! resources behind it. A pin may be GPIO-capable and timer-capable at
//! the same time; attach/detach walk whatever capabilities are present.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::source::{ChannelIndex, GpioBit, TimerChannel};

/// Error when resolving a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin id is past the end of the pin table
    OutOfRange,
}

/// Interrupt capabilities of one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinDescriptor {
    /// Bit on the GPIO edge-interrupt block
    pub gpio_bit: Option<GpioBit>,
    /// Output-compare channel driven by this pin
    pub output_compare: Option<ChannelIndex>,
    /// Input-capture channel fed by this pin
    pub input_capture: Option<ChannelIndex>,
    /// Pin id stands for the core system tick, not a real input
    #[cfg_attr(feature = "serde", serde(default))]
    pub system_tick: bool,
}

impl PinDescriptor {
    /// Pin with no interrupt capability
    pub const fn none() -> Self {
        Self {
            gpio_bit: None,
            output_compare: None,
            input_capture: None,
            system_tick: false,
        }
    }

    /// Plain GPIO pin
    pub const fn gpio(bit: GpioBit) -> Self {
        Self {
            gpio_bit: Some(bit),
            ..Self::none()
        }
    }

    /// The designated system-tick pin
    pub const fn tick_pin() -> Self {
        Self {
            system_tick: true,
            ..Self::none()
        }
    }

    /// Add an output-compare channel
    pub const fn with_output_compare(self, index: ChannelIndex) -> Self {
        Self {
            output_compare: Some(index),
            ..self
        }
    }

    /// Add an input-capture channel
    pub const fn with_input_capture(self, index: ChannelIndex) -> Self {
        Self {
            input_capture: Some(index),
            ..self
        }
    }

    /// Timer channels behind this pin, output-compare first
    pub fn timer_channels(&self) -> impl Iterator<Item = TimerChannel> {
        [
            self.output_compare.map(TimerChannel::output_compare),
            self.input_capture.map(TimerChannel::input_capture),
        ]
        .into_iter()
        .flatten()
    }

    /// Check if any timer channel is routed to this pin
    pub fn is_timer_capable(&self) -> bool {
        self.output_compare.is_some() || self.input_capture.is_some()
    }
}

/// Look up a pin id in the pin table
pub fn resolve(pins: &[PinDescriptor], pin: u32) -> Result<&PinDescriptor, PinError> {
    usize::try_from(pin)
        .ok()
        .and_then(|index| pins.get(index))
        .ok_or(PinError::OutOfRange)
        .inspect_err(|_| trace!("pin {} out of range", pin))
}
