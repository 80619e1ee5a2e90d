//! Auxiliary timer control register layout
//!
//! Flag and interrupt-enable bits for each sub-channel live in the same
//! control register. Input-capture channels additionally carry the masks
//! used to program their edge-detection window.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::source::{ChannelIndex, ChannelKind, TimerChannel};

/// Control bits of one output-compare channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OcpControl {
    /// Interrupt flag bit
    pub flag: u32,
    /// Interrupt enable bit
    pub enable: u32,
}

/// Control bits of one input-capture channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IcpControl {
    /// Interrupt flag bit
    pub flag: u32,
    /// Interrupt enable bit
    pub enable: u32,
    /// AND mask applied before reprogramming the window
    pub control_and: u32,
    /// Polarity bit, set when window start <= stop
    pub polarity: u32,
    /// Bits ORed in after reprogramming the window
    pub control_or: u32,
    /// Apply mask committing the window registers
    pub apply: u32,
}

/// Bit layout of the auxiliary timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerLayout {
    /// Output-compare channels 0 and 1
    pub ocp: [OcpControl; 2],
    /// Input-capture channels 0 and 1
    pub icp: [IcpControl; 2],
    /// Apply mask committing the control register
    pub apply_control: u32,
}

impl TimerLayout {
    /// Interrupt flag bit of `channel`
    pub fn flag(&self, channel: TimerChannel) -> u32 {
        let index = channel.index.as_u8() as usize;
        match channel.kind {
            ChannelKind::OutputCompare => self.ocp[index].flag,
            ChannelKind::InputCapture => self.icp[index].flag,
        }
    }

    /// Interrupt enable bit of `channel`
    pub fn enable(&self, channel: TimerChannel) -> u32 {
        let index = channel.index.as_u8() as usize;
        match channel.kind {
            ChannelKind::OutputCompare => self.ocp[index].enable,
            ChannelKind::InputCapture => self.icp[index].enable,
        }
    }

    /// Enable bits of all four channels
    pub fn enable_mask(&self) -> u32 {
        TimerChannel::ALL
            .iter()
            .fold(0, |mask, &channel| mask | self.enable(channel))
    }

    /// Window control of an input-capture channel
    pub fn icp(&self, index: ChannelIndex) -> &IcpControl {
        &self.icp[index.as_u8() as usize]
    }

    /// Check that every flag and enable bit is set and none overlap
    ///
    /// Clearing one channel's flag must never touch another channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = 0u32;
        for channel in TimerChannel::ALL {
            for bits in [self.flag(channel), self.enable(channel)] {
                if bits == 0 || bits & seen != 0 {
                    return Err(ConfigError::TimerMask);
                }
                seen |= bits;
            }
        }
        if self.apply_control == 0 {
            return Err(ConfigError::TimerMask);
        }
        Ok(())
    }
}
