//! Logical interrupt sources
//!
//! A logical source is what application code attaches a callback to.
//! Several of them share each physical line.

pub use fanout_hal::Edge;

use crate::config::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of GPIO bits on the edge-interrupt block
pub const GPIO_BITS: u8 = 32;

/// Number of auxiliary timer sub-channels (2 OCP + 2 ICP)
pub const TIMER_CHANNELS: usize = 4;

/// A bit position on the GPIO edge-interrupt block (0-31)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct GpioBit(u8);

impl GpioBit {
    /// Create a bit position, or `None` if it is not below [`GPIO_BITS`]
    pub const fn new(bit: u8) -> Option<Self> {
        if bit < GPIO_BITS {
            Some(Self(bit))
        } else {
            None
        }
    }

    /// Get the bit position
    pub const fn position(self) -> u8 {
        self.0
    }

    /// Get the single-bit mask for this position
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

impl TryFrom<u8> for GpioBit {
    type Error = ConfigError;

    fn try_from(bit: u8) -> Result<Self, Self::Error> {
        Self::new(bit).ok_or(ConfigError::InvalidGpioBit)
    }
}

impl From<GpioBit> for u8 {
    fn from(bit: GpioBit) -> u8 {
        bit.0
    }
}

/// Timer sub-channel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelKind {
    /// Counter matched a programmed value
    OutputCompare,
    /// Edge captured on an input
    InputCapture,
}

/// Index of a channel within its kind (two of each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum ChannelIndex {
    /// Channel 0
    First,
    /// Channel 1
    Second,
}

impl ChannelIndex {
    /// Get the index as a number (0 or 1)
    pub const fn as_u8(self) -> u8 {
        match self {
            ChannelIndex::First => 0,
            ChannelIndex::Second => 1,
        }
    }

    /// Create an index from a number
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ChannelIndex::First),
            1 => Some(ChannelIndex::Second),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ChannelIndex {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(ConfigError::InvalidChannel)
    }
}

impl From<ChannelIndex> for u8 {
    fn from(index: ChannelIndex) -> u8 {
        index.as_u8()
    }
}

/// One of the four auxiliary timer sub-channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerChannel {
    /// Output-compare or input-capture
    pub kind: ChannelKind,
    /// Index within the kind
    pub index: ChannelIndex,
}

impl TimerChannel {
    /// All channels in slot order: OCP0, OCP1, ICP0, ICP1
    pub const ALL: [TimerChannel; TIMER_CHANNELS] = [
        TimerChannel::output_compare(ChannelIndex::First),
        TimerChannel::output_compare(ChannelIndex::Second),
        TimerChannel::input_capture(ChannelIndex::First),
        TimerChannel::input_capture(ChannelIndex::Second),
    ];

    /// Output-compare channel
    pub const fn output_compare(index: ChannelIndex) -> Self {
        Self {
            kind: ChannelKind::OutputCompare,
            index,
        }
    }

    /// Input-capture channel
    pub const fn input_capture(index: ChannelIndex) -> Self {
        Self {
            kind: ChannelKind::InputCapture,
            index,
        }
    }

    /// Callback slot: output-compare channels first, then input-capture
    pub const fn slot(self) -> usize {
        let base = match self.kind {
            ChannelKind::OutputCompare => 0,
            ChannelKind::InputCapture => 2,
        };
        base + self.index.as_u8() as usize
    }
}

/// Application-visible event source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicalSource {
    /// Edge on a GPIO bit
    DigitalEdge {
        /// Bit on the GPIO block
        bit: GpioBit,
        /// Edge direction
        edge: Edge,
    },
    /// Auxiliary timer sub-channel event
    Timer(TimerChannel),
    /// Core counter compare match
    SystemTick,
}

/// Attach mode
///
/// GPIO pins use the edge selectors. On the tick-designated pin a
/// non-zero `Interval` replaces the tick interval (raw counter units);
/// `Interval(0)` keeps the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Fire on rising edges
    Rising,
    /// Fire on falling edges
    Falling,
    /// Tick interval in counter units
    Interval(u32),
}

impl Mode {
    /// Edge selected by this mode, if any
    pub const fn edge(self) -> Option<Edge> {
        match self {
            Mode::Rising => Some(Edge::Rising),
            Mode::Falling => Some(Edge::Falling),
            Mode::Interval(_) => None,
        }
    }

    /// New tick interval requested by this mode, if any
    pub const fn interval(self) -> Option<u32> {
        match self {
            Mode::Interval(0) | Mode::Rising | Mode::Falling => None,
            Mode::Interval(n) => Some(n),
        }
    }
}
